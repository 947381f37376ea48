//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CAP code - vehicle-configuration identifier, newtype for type safety.
///
/// The CAP code is the join key across provider rate sheets. The inner
/// String is private to ensure all construction goes through the defined
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapCode(String);

impl CapCode {
    /// Create a new CapCode from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the CAP code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CapCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for CapCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Funder/provider identifier - newtype for type safety.
///
/// Identifies the leasing finance source a rate sheet came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderCode(String);

impl ProviderCode {
    /// Create a new ProviderCode from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the provider code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProviderCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ProviderCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_code_new_and_as_str() {
        let code = CapCode::new("AUDI-A3-SB-35TFSI");
        assert_eq!(code.as_str(), "AUDI-A3-SB-35TFSI");
    }

    #[test]
    fn cap_code_from_string() {
        let code = CapCode::from("BMW320I".to_string());
        assert_eq!(code.as_str(), "BMW320I");
    }

    #[test]
    fn cap_code_display() {
        let code = CapCode::new("display-test");
        assert_eq!(format!("{}", code), "display-test");
    }

    #[test]
    fn provider_code_new_and_as_str() {
        let code = ProviderCode::new("LEX");
        assert_eq!(code.as_str(), "LEX");
    }

    #[test]
    fn provider_code_from_str() {
        let code = ProviderCode::from("ALD");
        assert_eq!(code.as_str(), "ALD");
    }

    #[test]
    fn provider_code_display() {
        let code = ProviderCode::new("ARV");
        assert_eq!(format!("{}", code), "ARV");
    }
}

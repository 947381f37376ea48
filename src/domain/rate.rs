//! Internal rate-sheet records.

use serde::{Deserialize, Serialize};

use super::ids::{CapCode, ProviderCode};
use super::money::Pence;

/// Contract type a rate was priced for.
///
/// Wire strings match the snapshot feed (`"BCH"`, `"PCH"`, `"SS"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Business contract hire.
    #[serde(rename = "BCH")]
    BusinessContractHire,
    /// Personal contract hire.
    #[serde(rename = "PCH")]
    PersonalContractHire,
    /// Salary sacrifice.
    #[serde(rename = "SS")]
    SalarySacrifice,
}

impl ContractType {
    /// Stable short label used in output and config.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusinessContractHire => "BCH",
            Self::PersonalContractHire => "PCH",
            Self::SalarySacrifice => "SS",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BCH" => Ok(Self::BusinessContractHire),
            "PCH" => Ok(Self::PersonalContractHire),
            "SS" => Ok(Self::SalarySacrifice),
            other => Err(format!("unknown contract type: {other}")),
        }
    }
}

/// One priced derivative from a provider rate sheet.
///
/// Rate imports are append-only: superseded batches stay in the feed with
/// `snapshot_is_latest = false` and are excluded from live comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecord {
    /// Vehicle-configuration join key.
    pub cap_code: CapCode,
    pub manufacturer: String,
    pub model: String,
    /// Derivative/trim description, e.g. "35 TFSI Sport 5dr".
    pub variant: String,
    pub provider: ProviderCode,
    pub contract_type: ContractType,
    /// Contract length in months.
    pub term_months: u32,
    pub annual_mileage: u32,
    /// Total monthly rental in pence (finance and maintenance elements combined).
    pub total_rental: Pence,
    /// P11D-equivalent list value in pence.
    pub vehicle_value: Pence,
    pub co2_gkm: u32,
    /// Benefit-in-Kind percentage band, where known.
    #[serde(default)]
    pub bik_percent: Option<rust_decimal::Decimal>,
    /// Score computed at import time, if the importer ran the engine.
    #[serde(default)]
    pub cached_score: Option<u8>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub body_style: Option<String>,
    /// Whether this row belongs to the current import batch for its lineage.
    pub snapshot_is_latest: bool,
}

impl RateRecord {
    /// Whether this record participates in live comparisons.
    pub fn is_live(&self, contract_type: ContractType) -> bool {
        self.snapshot_is_latest && self.contract_type == contract_type
    }

    /// Whether this derivative is zero-emission per its CO2 figure.
    pub fn is_zero_emission(&self) -> bool {
        self.co2_gkm == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_type_round_trips_wire_string() {
        for ct in [
            ContractType::BusinessContractHire,
            ContractType::PersonalContractHire,
            ContractType::SalarySacrifice,
        ] {
            let parsed: ContractType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, ct);
        }
    }

    #[test]
    fn contract_type_parse_is_case_insensitive() {
        let parsed: ContractType = "pch".parse().unwrap();
        assert_eq!(parsed, ContractType::PersonalContractHire);
        assert!("lease".parse::<ContractType>().is_err());
    }

    #[test]
    fn contract_type_serde_uses_short_codes() {
        let json = serde_json::to_string(&ContractType::SalarySacrifice).unwrap();
        assert_eq!(json, "\"SS\"");
    }
}

//! Manufacturer/model name normalization for cross-source matching.
//!
//! Every feed spells vehicles differently ("Mercedes-Benz" vs "mercedes
//! benz", "Golf GTI" vs "Golf"). Matching runs on normalized keys: folded
//! case, stripped punctuation, and a declarative manufacturer alias table.
//! There is no cache of previously-seen names; normalization is a pure
//! string function.

use serde::Deserialize;

/// Manufacturer aliases, keyed on the folded (lowercase, no hyphen/space)
/// form. Kept deliberately small; the folding itself absorbs most spelling
/// variance.
const MANUFACTURER_ALIASES: &[(&str, &str)] = &[
    ("mercedesbenz", "mercedes"),
    ("volkswagen", "vw"),
    ("alfaromeo", "alfa"),
    ("citroen", "citroen"),
];

/// Matching strictness knobs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchOptions {
    /// When true, models match only on exact normalized equality.
    ///
    /// The default (false) also accepts substring containment, so
    /// "3 Series" pairs with "3 Series Saloon". Containment can false-match
    /// very short model names; that looseness is the accepted default and
    /// this switch exists for feeds where it bites.
    #[serde(default)]
    pub strict_models: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            strict_models: false,
        }
    }
}

/// Normalize a manufacturer string to its matching key.
pub fn normalize_manufacturer(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    for (alias, canonical) in MANUFACTURER_ALIASES {
        if folded == *alias {
            return (*canonical).to_string();
        }
    }
    folded
}

/// Normalize a model string to its matching key.
pub fn normalize_model(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '\'' | '"' | '\u{2019}' | '`'))
        .collect()
}

/// Whether two manufacturer strings refer to the same marque.
pub fn same_manufacturer(a: &str, b: &str) -> bool {
    normalize_manufacturer(a) == normalize_manufacturer(b)
}

/// Match predicate for a (manufacturer, model) pair across two records.
///
/// Manufacturers must normalize identically. Models match on normalized
/// equality, or (unless `strict_models`) when one key contains the other.
pub fn vehicle_match(
    a_manufacturer: &str,
    a_model: &str,
    b_manufacturer: &str,
    b_model: &str,
    options: MatchOptions,
) -> bool {
    if !same_manufacturer(a_manufacturer, b_manufacturer) {
        return false;
    }

    let a = normalize_model(a_model);
    let b = normalize_model(b_model);

    if a == b {
        return true;
    }
    if options.strict_models || a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manufacturer_spellings_fold_to_one_key() {
        let a = normalize_manufacturer("Mercedes-Benz");
        let b = normalize_manufacturer("mercedes benz");
        let c = normalize_manufacturer("MercedesBenz");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, "mercedes");
    }

    #[test]
    fn volkswagen_aliases_to_vw() {
        assert!(same_manufacturer("VW", "Volkswagen"));
        assert!(same_manufacturer("volks wagen", "VW"));
    }

    #[test]
    fn model_normalization_strips_punctuation() {
        assert_eq!(normalize_model("e-tron GT"), "etrongt");
        assert_eq!(normalize_model("Grandland 'X'"), "grandlandx");
    }

    #[test]
    fn containment_matches_variant_suffix() {
        assert!(vehicle_match(
            "VW",
            "Golf GTI",
            "Volkswagen",
            "Golf",
            MatchOptions::default()
        ));
        assert!(vehicle_match(
            "BMW",
            "3 Series",
            "BMW",
            "3 Series Saloon",
            MatchOptions::default()
        ));
    }

    #[test]
    fn different_manufacturer_never_matches() {
        assert!(!vehicle_match(
            "BMW",
            "3 Series",
            "Audi",
            "3 Series",
            MatchOptions::default()
        ));
    }

    #[test]
    fn strict_mode_requires_exact_model() {
        let strict = MatchOptions {
            strict_models: true,
        };
        assert!(!vehicle_match("VW", "Golf GTI", "VW", "Golf", strict));
        assert!(vehicle_match("VW", "Golf", "Volkswagen", "golf", strict));
    }

    #[test]
    fn empty_model_only_matches_empty() {
        assert!(!vehicle_match(
            "BMW",
            "",
            "BMW",
            "3 Series",
            MatchOptions::default()
        ));
        assert!(vehicle_match("BMW", "", "BMW", "", MatchOptions::default()));
    }
}

//! Rental value scoring.
//!
//! A score answers "how much of this vehicle's list value does the contract
//! consume?". The cost ratio (total rent over the term as a percentage of
//! P11D value) maps to a 0-100 score through a monotone piecewise-linear
//! breakpoint table, then a qualitative band is read off configured
//! thresholds. The salary-sacrifice variant layers tax adjustments on top of
//! the same core mapping rather than forking it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::{percent_of, Pence};
use super::rate::{ContractType, RateRecord};

/// Band reported for unusable inputs (missing value, absurd ratio).
pub const DATA_ISSUE_BAND: &str = "Data Issue";

/// A computed value score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Integer score in [0, 100].
    pub score: u8,
    /// Qualitative band label, e.g. "Good".
    pub band: String,
}

impl ScoreResult {
    fn data_issue() -> Self {
        Self {
            score: 0,
            band: DATA_ISSUE_BAND.to_string(),
        }
    }
}

/// Ratio-to-score breakpoint table.
///
/// Each entry maps a cost-ratio percentage to the score awarded at that
/// ratio; scores between entries interpolate linearly. Beyond the last
/// entry the final segment's slope continues down to `floor`. One table,
/// one formula - competing historical variants were reconciled into this.
#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointTable {
    /// (ratio percent, score) pairs, ratios strictly increasing, scores
    /// non-increasing.
    pub points: Vec<(Decimal, u8)>,
    /// Minimum score awarded past the end of the table.
    #[serde(default = "default_floor")]
    pub floor: u8,
    /// Ratios above this are treated as corrupt input, not outliers.
    #[serde(default = "default_ratio_ceiling")]
    pub ratio_ceiling: Decimal,
}

fn default_floor() -> u8 {
    10
}

fn default_ratio_ceiling() -> Decimal {
    dec!(200)
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self {
            points: vec![
                (dec!(20), 95),
                (dec!(28), 80),
                (dec!(38), 65),
                (dec!(48), 50),
                (dec!(58), 40),
                (dec!(70), 25),
            ],
            floor: default_floor(),
            ratio_ceiling: default_ratio_ceiling(),
        }
    }
}

impl BreakpointTable {
    /// Check table invariants: non-empty, ratios strictly increasing,
    /// scores non-increasing, floor below the last score.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("breakpoint table must not be empty".to_string());
        }
        for pair in self.points.windows(2) {
            let (r0, s0) = pair[0];
            let (r1, s1) = pair[1];
            if r1 <= r0 {
                return Err(format!("breakpoint ratios must increase: {r0} then {r1}"));
            }
            if s1 > s0 {
                return Err(format!("breakpoint scores must not increase: {s0} then {s1}"));
            }
        }
        if let Some(&(_, last)) = self.points.last() {
            if self.floor > last {
                return Err(format!(
                    "floor {} exceeds final breakpoint score {last}",
                    self.floor
                ));
            }
        }
        if self.ratio_ceiling <= Decimal::ZERO {
            return Err("ratio ceiling must be positive".to_string());
        }
        Ok(())
    }

    /// Interpolate a score for a cost ratio percentage.
    fn score_for_ratio(&self, ratio: Decimal) -> u8 {
        let (first_ratio, first_score) = self.points[0];
        if ratio <= first_ratio {
            return first_score;
        }

        for pair in self.points.windows(2) {
            let (r0, s0) = pair[0];
            let (r1, s1) = pair[1];
            if ratio <= r1 {
                return interpolate(ratio, r0, s0, r1, s1);
            }
        }

        // Past the table: continue the last segment's slope down to the floor.
        let n = self.points.len();
        if n < 2 {
            return self.floor;
        }
        let (r0, s0) = self.points[n - 2];
        let (r1, s1) = self.points[n - 1];
        let span = r1 - r0;
        if span <= Decimal::ZERO {
            return self.floor;
        }
        let slope = (Decimal::from(s0) - Decimal::from(s1)) / span;
        let projected = Decimal::from(s1) - slope * (ratio - r1);
        let floored = projected.max(Decimal::from(self.floor));
        clamp_score(floored)
    }
}

fn interpolate(ratio: Decimal, r0: Decimal, s0: u8, r1: Decimal, s1: u8) -> u8 {
    let span = r1 - r0;
    let fraction = (ratio - r0) / span;
    let value = Decimal::from(s0) - fraction * (Decimal::from(s0) - Decimal::from(s1));
    clamp_score(value)
}

fn clamp_score(value: Decimal) -> u8 {
    value
        .round()
        .to_u8()
        .unwrap_or(0)
        .min(100)
}

/// Band thresholds: band label to the minimum score that earns it.
///
/// Matches the external `ScoringConfig` contract; unknown or missing
/// configuration falls back to defaults rather than blocking.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringThresholds {
    pub bands: Vec<BandThreshold>,
}

/// One band entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BandThreshold {
    pub band: String,
    pub min: u8,
}

/// Default minimum for the "good" band when configuration is absent.
pub const DEFAULT_GOOD_MINIMUM: u8 = 70;

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            bands: vec![
                BandThreshold {
                    band: "Excellent".to_string(),
                    min: 85,
                },
                BandThreshold {
                    band: "Good".to_string(),
                    min: DEFAULT_GOOD_MINIMUM,
                },
                BandThreshold {
                    band: "Average".to_string(),
                    min: 50,
                },
                BandThreshold {
                    band: "Poor".to_string(),
                    min: 0,
                },
            ],
        }
    }
}

impl ScoringThresholds {
    /// Resolve the band for a score: the highest `min` the score meets.
    pub fn band_for(&self, score: u8) -> String {
        self.bands
            .iter()
            .filter(|b| score >= b.min)
            .max_by_key(|b| b.min)
            .map(|b| b.band.clone())
            .unwrap_or_else(|| "Unbanded".to_string())
    }

    /// Minimum score counted as "good", used by feature suggestions.
    ///
    /// Falls back to [`DEFAULT_GOOD_MINIMUM`] when no band named "good" is
    /// configured.
    pub fn good_minimum(&self) -> u8 {
        self.bands
            .iter()
            .find(|b| b.band.eq_ignore_ascii_case("good"))
            .map(|b| b.min)
            .unwrap_or(DEFAULT_GOOD_MINIMUM)
    }
}

/// Tax inputs for the salary-sacrifice variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalarySacrificeInputs {
    /// Benefit-in-Kind percentage band.
    pub bik_percent: Option<Decimal>,
    /// Monthly BIK tax burden in pence.
    pub bik_tax: Option<Pence>,
    pub zero_emission: bool,
}

/// Knobs for the salary-sacrifice adjustment layer.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SalarySacrificeAdjustments {
    /// Flat score bonus for zero-emission vehicles.
    #[serde(default = "default_zero_emission_bonus")]
    pub zero_emission_bonus: u8,
    /// BIK burden percentage below which no penalty applies.
    #[serde(default = "default_bik_trigger_percent")]
    pub bik_trigger_percent: Decimal,
}

fn default_zero_emission_bonus() -> u8 {
    10
}

fn default_bik_trigger_percent() -> Decimal {
    dec!(2)
}

impl Default for SalarySacrificeAdjustments {
    fn default() -> Self {
        Self {
            zero_emission_bonus: default_zero_emission_bonus(),
            bik_trigger_percent: default_bik_trigger_percent(),
        }
    }
}

/// The scoring engine: breakpoint table, band thresholds, and
/// salary-sacrifice adjustments bundled for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    pub breakpoints: BreakpointTable,
    pub thresholds: ScoringThresholds,
    pub adjustments: SalarySacrificeAdjustments,
}

impl Scorer {
    /// Cost of the contract as a percentage of vehicle value.
    ///
    /// `None` when the vehicle value is missing or non-positive.
    pub fn cost_ratio_percent(
        rental: Pence,
        term_months: u32,
        vehicle_value: Pence,
    ) -> Option<Decimal> {
        if vehicle_value <= 0 {
            return None;
        }
        let total = Decimal::from(rental) * Decimal::from(term_months);
        Some(total / Decimal::from(vehicle_value) * Decimal::ONE_HUNDRED)
    }

    /// Score a plain contract-hire rental.
    ///
    /// Degrades to score 0 / "Data Issue" on unusable input; never panics.
    pub fn score(&self, rental: Pence, term_months: u32, vehicle_value: Pence) -> ScoreResult {
        let Some(ratio) = Self::cost_ratio_percent(rental, term_months, vehicle_value) else {
            return ScoreResult::data_issue();
        };
        if ratio > self.breakpoints.ratio_ceiling {
            return ScoreResult::data_issue();
        }

        let score = self.breakpoints.score_for_ratio(ratio.max(Decimal::ZERO));
        self.banded(score)
    }

    /// Score a salary-sacrifice rental: the core mapping decorated with tax
    /// adjustments.
    pub fn score_salary_sacrifice(
        &self,
        rental: Pence,
        term_months: u32,
        vehicle_value: Pence,
        inputs: SalarySacrificeInputs,
    ) -> ScoreResult {
        let base = self.score(rental, term_months, vehicle_value);
        if base.band == DATA_ISSUE_BAND {
            return base;
        }
        let adjusted = self.apply_salary_sacrifice(base.score, rental, inputs);
        self.banded(adjusted)
    }

    /// Score a rate record, honoring an import-time cached score and
    /// dispatching salary-sacrifice contracts through the variant.
    pub fn score_rate(&self, rate: &RateRecord) -> ScoreResult {
        if let Some(cached) = rate.cached_score {
            let cached = cached.min(100);
            return self.banded(cached);
        }
        match rate.contract_type {
            ContractType::SalarySacrifice => self.score_salary_sacrifice(
                rate.total_rental,
                rate.term_months,
                rate.vehicle_value,
                SalarySacrificeInputs {
                    bik_percent: rate.bik_percent,
                    bik_tax: None,
                    zero_emission: rate.is_zero_emission(),
                },
            ),
            _ => self.score(rate.total_rental, rate.term_months, rate.vehicle_value),
        }
    }

    /// The adjustment layer on its own: BIK burden scales the score down
    /// proportionally, then the zero-emission bonus applies, capped at 100.
    fn apply_salary_sacrifice(
        &self,
        base: u8,
        rental: Pence,
        inputs: SalarySacrificeInputs,
    ) -> u8 {
        let burden = inputs.bik_percent.or_else(|| {
            inputs
                .bik_tax
                .filter(|_| rental > 0)
                .map(|tax| percent_of(tax, rental))
        });

        let mut score = Decimal::from(base);
        if let Some(burden) = burden {
            if burden >= self.adjustments.bik_trigger_percent {
                let retained = (Decimal::ONE_HUNDRED - burden.min(Decimal::ONE_HUNDRED))
                    / Decimal::ONE_HUNDRED;
                score *= retained;
            }
        }

        let mut adjusted = clamp_score(score);
        if inputs.zero_emission {
            adjusted = adjusted.saturating_add(self.adjustments.zero_emission_bonus);
        }
        adjusted.min(100)
    }

    fn banded(&self, score: u8) -> ScoreResult {
        ScoreResult {
            score,
            band: self.thresholds.band_for(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> Scorer {
        Scorer::default()
    }

    #[test]
    fn worked_example_lands_in_interpolation_band() {
        // 45000 * 36 / 3,000,000 = 54% ratio, between the 48->50 and 58->40
        // breakpoints.
        let result = scorer().score(45_000, 36, 3_000_000);
        assert_eq!(result.score, 44);
        assert!((40..=50).contains(&result.score));
    }

    #[test]
    fn cheap_contract_scores_at_top_of_table() {
        // 30000 * 24 / 4,000,000 = 18% ratio, below the first breakpoint.
        let result = scorer().score(30_000, 24, 4_000_000);
        assert_eq!(result.score, 95);
        assert_eq!(result.band, "Excellent");
    }

    #[test]
    fn missing_vehicle_value_is_a_data_issue() {
        let zero = scorer().score(45_000, 36, 0);
        assert_eq!(zero.score, 0);
        assert_eq!(zero.band, DATA_ISSUE_BAND);

        let negative = scorer().score(45_000, 36, -100);
        assert_eq!(negative.score, 0);
        assert_eq!(negative.band, DATA_ISSUE_BAND);
    }

    #[test]
    fn absurd_ratio_is_a_data_issue_not_an_outlier() {
        // 90000 * 48 / 2,000,000 = 216% ratio.
        let result = scorer().score(90_000, 48, 2_000_000);
        assert_eq!(result.score, 0);
        assert_eq!(result.band, DATA_ISSUE_BAND);
    }

    #[test]
    fn past_table_decays_to_floor() {
        // 70000 * 48 / 2,000,000 = 168%: far past the last breakpoint.
        let result = scorer().score(70_000, 48, 2_000_000);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn score_is_monotone_in_ratio() {
        let s = scorer();
        let mut last = 100;
        // Sweep rentals upwards at fixed term/value so the ratio rises.
        for rental in (10_000..120_000).step_by(1_000) {
            let result = s.score(rental, 36, 3_000_000);
            assert!(
                result.score <= last,
                "score rose from {last} to {} at rental {rental}",
                result.score
            );
            last = result.score;
        }
    }

    #[test]
    fn score_always_in_range() {
        let s = scorer();
        for rental in [0, 1, 9_999, 45_000, 200_000] {
            for term in [1, 24, 48] {
                for value in [1, 500_000, 3_000_000] {
                    let result = s.score(rental, term, value);
                    assert!(result.score <= 100);
                }
            }
        }
    }

    #[test]
    fn zero_emission_bonus_applies_and_caps() {
        let s = scorer();
        let base = s.score(30_000, 24, 4_000_000);
        let ev = s.score_salary_sacrifice(
            30_000,
            24,
            4_000_000,
            SalarySacrificeInputs {
                zero_emission: true,
                ..Default::default()
            },
        );
        assert_eq!(ev.score, (base.score + 10).min(100));
    }

    #[test]
    fn bik_burden_scales_score_down() {
        let s = scorer();
        let base = s.score(45_000, 36, 3_000_000);
        let taxed = s.score_salary_sacrifice(
            45_000,
            36,
            3_000_000,
            SalarySacrificeInputs {
                bik_percent: Some(dec!(25)),
                ..Default::default()
            },
        );
        assert!(taxed.score < base.score);
        // 25% burden retains 75% of the base score.
        assert_eq!(taxed.score, 33);
    }

    #[test]
    fn trivial_bik_burden_is_ignored() {
        let s = scorer();
        let base = s.score(45_000, 36, 3_000_000);
        let taxed = s.score_salary_sacrifice(
            45_000,
            36,
            3_000_000,
            SalarySacrificeInputs {
                bik_percent: Some(dec!(1)),
                ..Default::default()
            },
        );
        assert_eq!(taxed.score, base.score);
    }

    #[test]
    fn salary_sacrifice_keeps_data_issue_band() {
        let result = scorer().score_salary_sacrifice(
            45_000,
            36,
            0,
            SalarySacrificeInputs {
                zero_emission: true,
                ..Default::default()
            },
        );
        assert_eq!(result.score, 0);
        assert_eq!(result.band, DATA_ISSUE_BAND);
    }

    #[test]
    fn bik_tax_burden_derives_percentage() {
        let s = scorer();
        // 13500 tax on a 45000 rental is a 30% burden.
        let taxed = s.score_salary_sacrifice(
            45_000,
            36,
            3_000_000,
            SalarySacrificeInputs {
                bik_tax: Some(13_500),
                ..Default::default()
            },
        );
        let base = s.score(45_000, 36, 3_000_000);
        assert!(taxed.score < base.score);
    }

    #[test]
    fn band_thresholds_resolve_highest_met_minimum() {
        let thresholds = ScoringThresholds::default();
        assert_eq!(thresholds.band_for(92), "Excellent");
        assert_eq!(thresholds.band_for(70), "Good");
        assert_eq!(thresholds.band_for(69), "Average");
        assert_eq!(thresholds.band_for(3), "Poor");
    }

    #[test]
    fn good_minimum_defaults_when_band_missing() {
        let thresholds = ScoringThresholds { bands: vec![] };
        assert_eq!(thresholds.good_minimum(), DEFAULT_GOOD_MINIMUM);

        let custom = ScoringThresholds {
            bands: vec![BandThreshold {
                band: "good".to_string(),
                min: 60,
            }],
        };
        assert_eq!(custom.good_minimum(), 60);
    }

    #[test]
    fn breakpoint_validation_rejects_bad_tables() {
        let mut table = BreakpointTable::default();
        assert!(table.validate().is_ok());

        table.points[1].0 = dec!(10);
        assert!(table.validate().is_err());

        let mut rising = BreakpointTable::default();
        rising.points[1].1 = 99;
        assert!(rising.validate().is_err());

        let empty = BreakpointTable {
            points: vec![],
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn cached_score_short_circuits_computation() {
        use crate::domain::ids::{CapCode, ProviderCode};
        let rate = RateRecord {
            cap_code: CapCode::new("CAP1"),
            manufacturer: "BMW".to_string(),
            model: "3 Series".to_string(),
            variant: "320i M Sport".to_string(),
            provider: ProviderCode::new("LEX"),
            contract_type: ContractType::BusinessContractHire,
            term_months: 36,
            annual_mileage: 10_000,
            total_rental: 45_000,
            vehicle_value: 0, // would be a data issue if recomputed
            co2_gkm: 150,
            bik_percent: None,
            cached_score: Some(81),
            fuel_type: None,
            body_style: None,
            snapshot_is_latest: true,
        };
        let result = scorer().score_rate(&rate);
        assert_eq!(result.score, 81);
        assert_eq!(result.band, "Good");
    }
}

//! Competitor-deal to internal-rate matching.

use serde::Serialize;

use super::deal::CompetitorDeal;
use super::ids::{CapCode, ProviderCode};
use super::money::Pence;
use super::normalize::{vehicle_match, MatchOptions};
use super::rate::{ContractType, RateRecord};
use super::score::Scorer;

/// Cap on the candidate set carried per matched deal.
pub const MAX_MATCHED_RATES: usize = 3;

/// One of our derivatives matched against a competitor deal, for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRate {
    pub cap_code: CapCode,
    pub variant: String,
    pub provider: ProviderCode,
    /// Monthly rental in pence.
    pub monthly_price: Pence,
    pub score: u8,
}

/// A competitor deal paired with our cheapest matching derivatives.
#[derive(Debug, Clone)]
pub struct DealMatch<'a> {
    pub deal: &'a CompetitorDeal,
    /// Cheapest first, at most [`MAX_MATCHED_RATES`].
    pub rates: Vec<MatchedRate>,
}

impl DealMatch<'_> {
    /// Our best (lowest) monthly price among the matches.
    pub fn our_best_price(&self) -> Pence {
        self.rates[0].monthly_price
    }
}

/// Join competitor deals to internal rates for one contract type.
///
/// Only latest-snapshot rates of the requested contract type participate.
/// Returns matched pairs plus the deals that found no counterpart; a miss
/// is expected input, not an error.
pub fn match_deals<'a>(
    deals: &'a [CompetitorDeal],
    rates: &[RateRecord],
    contract_type: ContractType,
    options: MatchOptions,
    scorer: &Scorer,
) -> (Vec<DealMatch<'a>>, Vec<&'a CompetitorDeal>) {
    let live: Vec<&RateRecord> = rates
        .iter()
        .filter(|r| r.is_live(contract_type))
        .collect();

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for deal in deals {
        let mut candidates: Vec<&RateRecord> = live
            .iter()
            .copied()
            .filter(|rate| {
                vehicle_match(
                    &deal.manufacturer,
                    &deal.model,
                    &rate.manufacturer,
                    &rate.model,
                    options,
                )
            })
            .collect();

        if candidates.is_empty() {
            unmatched.push(deal);
            continue;
        }

        // Deterministic order: price, then provider and variant as tie-breaks.
        candidates.sort_by(|a, b| {
            a.total_rental
                .cmp(&b.total_rental)
                .then_with(|| a.provider.as_str().cmp(b.provider.as_str()))
                .then_with(|| a.variant.cmp(&b.variant))
        });

        let rates = candidates
            .into_iter()
            .take(MAX_MATCHED_RATES)
            .map(|rate| MatchedRate {
                cap_code: rate.cap_code.clone(),
                variant: rate.variant.clone(),
                provider: rate.provider.clone(),
                monthly_price: rate.total_rental,
                score: scorer.score_rate(rate).score,
            })
            .collect();

        matched.push(DealMatch { deal, rates });
    }

    (matched, unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rate(manufacturer: &str, model: &str, variant: &str, provider: &str, price: Pence) -> RateRecord {
        RateRecord {
            cap_code: CapCode::new(format!("{manufacturer}-{variant}")),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            variant: variant.to_string(),
            provider: ProviderCode::new(provider),
            contract_type: ContractType::BusinessContractHire,
            term_months: 36,
            annual_mileage: 10_000,
            total_rental: price,
            vehicle_value: 3_000_000,
            co2_gkm: 120,
            bik_percent: None,
            cached_score: None,
            fuel_type: None,
            body_style: None,
            snapshot_is_latest: true,
        }
    }

    fn deal(manufacturer: &str, model: &str, price: Pence) -> CompetitorDeal {
        CompetitorDeal {
            source: "leasecomp".to_string(),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            variant: None,
            monthly_price: price,
            initial_payment: None,
            term_months: Some(36),
            annual_mileage: Some(10_000),
            external_value_score: None,
            deal_count: 4,
            image_url: None,
            snapshot_id: "snap-1".to_string(),
            snapshot_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    #[test]
    fn matches_cheapest_first_capped_at_three() {
        let rates = vec![
            rate("BMW", "3 Series", "320i Sport", "LEX", 41_000),
            rate("BMW", "3 Series Saloon", "320i M Sport", "ALD", 39_000),
            rate("BMW", "3 Series", "318i SE", "ARV", 43_000),
            rate("BMW", "3 Series", "330e M Sport", "LEX", 45_000),
        ];
        let deals = vec![deal("BMW", "3 Series", 44_000)];

        let (matched, unmatched) = match_deals(
            &deals,
            &rates,
            ContractType::BusinessContractHire,
            MatchOptions::default(),
            &Scorer::default(),
        );

        assert!(unmatched.is_empty());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].rates.len(), MAX_MATCHED_RATES);
        assert_eq!(matched[0].our_best_price(), 39_000);
        assert_eq!(matched[0].rates[0].provider.as_str(), "ALD");
    }

    #[test]
    fn superseded_and_wrong_contract_rates_are_excluded() {
        let mut stale = rate("BMW", "3 Series", "320i", "LEX", 30_000);
        stale.snapshot_is_latest = false;
        let mut personal = rate("BMW", "3 Series", "320i", "LEX", 31_000);
        personal.contract_type = ContractType::PersonalContractHire;

        let deals = vec![deal("BMW", "3 Series", 44_000)];
        let (matched, unmatched) = match_deals(
            &deals,
            &[stale, personal],
            ContractType::BusinessContractHire,
            MatchOptions::default(),
            &Scorer::default(),
        );

        assert!(matched.is_empty());
        assert_eq!(unmatched.len(), 1);
    }

    #[test]
    fn unmatched_deal_is_reported_once() {
        let rates = vec![rate("Audi", "A4", "35 TFSI", "LEX", 38_000)];
        let deals = vec![deal("Tesla", "Model 3", 49_900)];

        let (matched, unmatched) = match_deals(
            &deals,
            &rates,
            ContractType::BusinessContractHire,
            MatchOptions::default(),
            &Scorer::default(),
        );

        assert!(matched.is_empty());
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].model, "Model 3");
    }

    #[test]
    fn matched_rates_carry_scores() {
        let rates = vec![rate("VW", "Golf", "GTI", "ALD", 35_000)];
        let deals = vec![deal("Volkswagen", "Golf GTI", 39_000)];

        let (matched, _) = match_deals(
            &deals,
            &rates,
            ContractType::BusinessContractHire,
            MatchOptions::default(),
            &Scorer::default(),
        );

        assert_eq!(matched.len(), 1);
        // 35000 * 36 / 3,000,000 = 42% ratio: inside the table, a real score.
        assert!(matched[0].rates[0].score > 0);
    }
}

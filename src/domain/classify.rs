//! Market-intelligence classification.
//!
//! One deterministic sweep: competitor deals are matched against our live
//! rates, and every comparison lands in exactly one bucket - Opportunity
//! (we are cheaper), Threat (we are beaten), or Gap (we have nothing to
//! offer). Price alerts and feature suggestions derive from the same pass.
//! No I/O, no state machine; callers hand in fully materialized snapshots.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::deal::{CompetitorDeal, DemandCount, DemandIndex, PriceDelta};
use super::matcher::{match_deals, DealMatch, MatchedRate};
use super::money::{percent_of, Pence};
use super::normalize::{normalize_manufacturer, normalize_model, MatchOptions};
use super::rate::{ContractType, RateRecord};
use super::score::Scorer;

/// Threat severity tiers on the price-difference percentage.
pub const SEVERITY_HIGH_PERCENT: Decimal = dec!(15);
pub const SEVERITY_MEDIUM_PERCENT: Decimal = dec!(8);

/// Price-alert trend threshold: moves inside +-3% are noise.
pub const TREND_THRESHOLD_PERCENT: Decimal = dec!(3);

/// Feature-suggestion gate and cap.
pub const SUGGESTION_MIN_MARGIN_PERCENT: Decimal = dec!(5);
pub const MAX_FEATURE_SUGGESTIONS: usize = 10;

/// A vehicle where we beat the competitor's advertised price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    pub variant: Option<String>,
    /// Competitor monthly price, pence.
    pub competitor_price: Pence,
    /// Our cheapest matching monthly price, pence.
    pub our_best_price: Pence,
    /// `competitor_price - our_best_price`, always positive here.
    pub price_difference: Pence,
    /// Difference relative to the competitor price.
    pub margin_percent: Decimal,
    /// Competitor deal-count demand proxy.
    pub deal_count: u32,
    /// Our top matched derivatives, cheapest first.
    pub matched_rates: Vec<MatchedRate>,
}

/// Severity tier for a threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    fn from_difference(difference_percent: Decimal) -> Self {
        if difference_percent >= SEVERITY_HIGH_PERCENT {
            Self::High
        } else if difference_percent >= SEVERITY_MEDIUM_PERCENT {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A vehicle where a competitor undercuts our best rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    pub variant: Option<String>,
    pub competitor_price: Pence,
    pub our_best_price: Pence,
    /// `competitor_price - our_best_price`, always negative here.
    pub price_difference: Pence,
    /// Absolute difference relative to the competitor price.
    pub difference_percent: Decimal,
    pub severity: Severity,
    pub matched_rates: Vec<MatchedRate>,
}

/// A competitor-popular vehicle we do not offer at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    pub variant: Option<String>,
    pub competitor_price: Pence,
    /// Competitor deal-count demand proxy.
    pub deal_count: u32,
    /// Our own rate-count statistic for this vehicle, 0 when unknown.
    pub popularity: u32,
}

/// Direction of a competitor price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    fn from_change(change_percent: Decimal) -> Self {
        if change_percent >= TREND_THRESHOLD_PERCENT {
            Self::Rising
        } else if change_percent <= -TREND_THRESHOLD_PERCENT {
            Self::Falling
        } else {
            Self::Stable
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
        }
    }
}

/// A competitor price change between two snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    pub variant: Option<String>,
    pub previous_price: Pence,
    pub current_price: Pence,
    pub change_percent: Decimal,
    pub trend: Trend,
}

/// A rate worth promoting, distilled from the strongest opportunities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSuggestion {
    pub manufacturer: String,
    pub model: String,
    pub variant: String,
    pub provider: String,
    pub margin_percent: Decimal,
    pub score: u8,
    pub deal_count: u32,
    /// Deterministic composition of margin/score/demand tier labels.
    pub rationale: String,
}

/// Run metadata carried alongside the classified buckets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceMetadata {
    pub last_fetch: DateTime<Utc>,
    pub competitor_deals_count: usize,
    pub our_rates_count: usize,
    pub snapshot_id: Option<String>,
    pub snapshot_date: Option<NaiveDate>,
}

/// The full output of one intelligence pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceResult {
    pub opportunities: Vec<Opportunity>,
    pub threats: Vec<Threat>,
    pub gaps: Vec<Gap>,
    pub price_alerts: Vec<PriceAlert>,
    pub feature_suggestions: Vec<FeatureSuggestion>,
    pub metadata: IntelligenceMetadata,
}

/// The mutually consistent input snapshots for one pass.
///
/// All four collections plus the demand statistics must come from the same
/// snapshot window; the gathering layer enforces all-or-nothing loading.
#[derive(Debug, Clone, Default)]
pub struct IntelligenceInputs {
    pub our_rates: Vec<RateRecord>,
    pub competitor_deals: Vec<CompetitorDeal>,
    /// Deals already known to have no internal counterpart.
    pub unmatched_deals: Vec<CompetitorDeal>,
    pub price_deltas: Vec<PriceDelta>,
    pub demand_counts: Vec<DemandCount>,
}

/// Classify one snapshot set into the five intelligence buckets.
///
/// Pure and synchronous; `fetched_at` is stamped by the caller that owns
/// the clock.
pub fn run_intelligence(
    inputs: &IntelligenceInputs,
    contract_type: ContractType,
    options: MatchOptions,
    scorer: &Scorer,
    fetched_at: DateTime<Utc>,
) -> IntelligenceResult {
    let demand = DemandIndex::from_counts(&inputs.demand_counts);

    let (matched, missed) = match_deals(
        &inputs.competitor_deals,
        &inputs.our_rates,
        contract_type,
        options,
        scorer,
    );

    let mut opportunities = Vec::new();
    let mut threats = Vec::new();

    for m in &matched {
        let competitor_price = m.deal.monthly_price;
        let our_best_price = m.our_best_price();
        let price_difference = competitor_price - our_best_price;

        match price_difference {
            d if d > 0 => opportunities.push(build_opportunity(m, d)),
            d if d < 0 => threats.push(build_threat(m, d)),
            // Dead heat: neither an opportunity nor a threat.
            _ => {}
        }
    }

    let gaps = build_gaps(&missed, &inputs.unmatched_deals, &demand);
    let price_alerts = build_price_alerts(&inputs.price_deltas);
    let feature_suggestions = build_feature_suggestions(&opportunities, scorer);

    opportunities.sort_by(|a, b| b.margin_percent.cmp(&a.margin_percent));
    threats.sort_by(|a, b| b.difference_percent.cmp(&a.difference_percent));

    IntelligenceResult {
        metadata: build_metadata(inputs, fetched_at),
        opportunities,
        threats,
        gaps,
        price_alerts,
        feature_suggestions,
    }
}

fn build_opportunity(m: &DealMatch<'_>, price_difference: Pence) -> Opportunity {
    let margin_percent = percent_of(price_difference, m.deal.monthly_price).round_dp(1);
    Opportunity {
        source: m.deal.source.clone(),
        manufacturer: m.deal.manufacturer.clone(),
        model: m.deal.model.clone(),
        variant: m.deal.variant.clone(),
        competitor_price: m.deal.monthly_price,
        our_best_price: m.our_best_price(),
        price_difference,
        margin_percent,
        deal_count: m.deal.deal_count,
        matched_rates: m.rates.clone(),
    }
}

fn build_threat(m: &DealMatch<'_>, price_difference: Pence) -> Threat {
    let difference_percent = percent_of(-price_difference, m.deal.monthly_price).round_dp(1);
    Threat {
        source: m.deal.source.clone(),
        manufacturer: m.deal.manufacturer.clone(),
        model: m.deal.model.clone(),
        variant: m.deal.variant.clone(),
        competitor_price: m.deal.monthly_price,
        our_best_price: m.our_best_price(),
        price_difference,
        difference_percent,
        severity: Severity::from_difference(difference_percent),
        matched_rates: m.rates.clone(),
    }
}

/// Union of live match misses and the pre-identified unmatched snapshot,
/// deduplicated on (source, manufacturer, model, variant).
fn build_gaps(
    missed: &[&CompetitorDeal],
    unmatched_snapshot: &[CompetitorDeal],
    demand: &DemandIndex,
) -> Vec<Gap> {
    let mut seen = std::collections::HashSet::new();
    let mut gaps = Vec::new();

    for deal in missed.iter().copied().chain(unmatched_snapshot.iter()) {
        let key = (
            deal.source.clone(),
            normalize_manufacturer(&deal.manufacturer),
            normalize_model(&deal.model),
            deal.variant.clone(),
        );
        if !seen.insert(key) {
            continue;
        }
        gaps.push(Gap {
            source: deal.source.clone(),
            manufacturer: deal.manufacturer.clone(),
            model: deal.model.clone(),
            variant: deal.variant.clone(),
            competitor_price: deal.monthly_price,
            deal_count: deal.deal_count,
            popularity: demand.lookup(&deal.manufacturer, &deal.model),
        });
    }

    gaps.sort_by(|a, b| {
        b.popularity
            .cmp(&a.popularity)
            .then_with(|| b.deal_count.cmp(&a.deal_count))
    });
    gaps
}

fn build_price_alerts(deltas: &[PriceDelta]) -> Vec<PriceAlert> {
    let mut alerts: Vec<PriceAlert> = deltas
        .iter()
        .map(|delta| {
            let change_percent =
                percent_of(delta.current_price - delta.previous_price, delta.previous_price)
                    .round_dp(1);
            PriceAlert {
                source: delta.source.clone(),
                manufacturer: delta.manufacturer.clone(),
                model: delta.model.clone(),
                variant: delta.variant.clone(),
                previous_price: delta.previous_price,
                current_price: delta.current_price,
                change_percent,
                trend: Trend::from_change(change_percent),
            }
        })
        .collect();

    alerts.sort_by(|a, b| b.change_percent.abs().cmp(&a.change_percent.abs()));
    alerts
}

/// Promote the strongest opportunities: real margin, a rate already scoring
/// at least "good", capped to the ten highest margins.
fn build_feature_suggestions(
    opportunities: &[Opportunity],
    scorer: &Scorer,
) -> Vec<FeatureSuggestion> {
    let good_minimum = scorer.thresholds.good_minimum();

    let mut suggestions: Vec<FeatureSuggestion> = opportunities
        .iter()
        .filter(|o| o.margin_percent >= SUGGESTION_MIN_MARGIN_PERCENT)
        .filter_map(|o| {
            let best = o.matched_rates.first()?;
            if best.score < good_minimum {
                return None;
            }
            Some(FeatureSuggestion {
                manufacturer: o.manufacturer.clone(),
                model: o.model.clone(),
                variant: best.variant.clone(),
                provider: best.provider.to_string(),
                margin_percent: o.margin_percent,
                score: best.score,
                deal_count: o.deal_count,
                rationale: compose_rationale(o.margin_percent, best.score, o.deal_count),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.margin_percent.cmp(&a.margin_percent));
    suggestions.truncate(MAX_FEATURE_SUGGESTIONS);
    suggestions
}

/// Fixed tier labels joined into one sentence; no free-text generation.
fn compose_rationale(margin_percent: Decimal, score: u8, deal_count: u32) -> String {
    let margin = if margin_percent >= dec!(15) {
        "Priced well below the market"
    } else if margin_percent >= dec!(10) {
        "A strong margin against the market"
    } else {
        "A healthy margin against the market"
    };
    let score_label = if score >= 85 {
        "an excellent value score"
    } else {
        "a good value score"
    };
    let demand = if deal_count >= 10 {
        "high competitor demand"
    } else if deal_count >= 3 {
        "steady competitor demand"
    } else {
        "niche competitor demand"
    };
    format!("{margin}, {score_label}, {demand}.")
}

fn build_metadata(inputs: &IntelligenceInputs, fetched_at: DateTime<Utc>) -> IntelligenceMetadata {
    let newest = inputs
        .competitor_deals
        .iter()
        .max_by_key(|d| d.snapshot_date);
    IntelligenceMetadata {
        last_fetch: fetched_at,
        competitor_deals_count: inputs.competitor_deals.len(),
        our_rates_count: inputs.our_rates.len(),
        snapshot_id: newest.map(|d| d.snapshot_id.clone()),
        snapshot_date: newest.map(|d| d.snapshot_date),
    }
}

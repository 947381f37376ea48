//! Source-agnostic domain logic.
//!
//! Everything under this module is pure and synchronous: scoring, name
//! normalization, deal matching, classification, and heatmap aggregation
//! all operate on in-memory collections handed in by the caller.

mod classify;
mod deal;
mod heatmap;
mod ids;
mod matcher;
mod money;
mod rate;
mod score;

pub mod normalize;

pub use normalize::MatchOptions;

// Core domain types
pub use deal::{CompetitorDeal, DemandCount, DemandIndex, PriceDelta};
pub use ids::{CapCode, ProviderCode};
pub use money::{format_pounds, percent_of, Pence};
pub use rate::{ContractType, RateRecord};

// Scoring engine
pub use score::{
    BandThreshold, BreakpointTable, SalarySacrificeAdjustments, SalarySacrificeInputs,
    ScoreResult, Scorer, ScoringThresholds, DATA_ISSUE_BAND, DEFAULT_GOOD_MINIMUM,
};

// Matching and classification
pub use matcher::{match_deals, DealMatch, MatchedRate, MAX_MATCHED_RATES};

pub use classify::{
    run_intelligence, FeatureSuggestion, Gap, IntelligenceInputs, IntelligenceMetadata,
    IntelligenceResult, Opportunity, PriceAlert, Severity, Threat, Trend,
    MAX_FEATURE_SUGGESTIONS,
};

// Heatmap aggregation
pub use heatmap::{
    build_heatmap, ColumnMode, HeatmapCell, HeatmapColumn, HeatmapFilter, HeatmapRequest,
    HeatmapResult, HeatmapRow, Metric, RowMode, DEFAULT_ROW_LIMIT, MAX_ROW_LIMIT, MIN_ROW_LIMIT,
};

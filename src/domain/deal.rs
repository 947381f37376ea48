//! Competitor aggregate records and derived lookup tables.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Pence;
use super::normalize::{normalize_manufacturer, normalize_model};

/// One aggregate deal scraped from a competitor site.
///
/// Immutable once captured; a fresh scrape produces a new snapshot rather
/// than updating rows in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorDeal {
    /// Which competitor/aggregator the deal came from.
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(default)]
    pub variant: Option<String>,
    /// Advertised monthly price in pence.
    pub monthly_price: Pence,
    #[serde(default)]
    pub initial_payment: Option<Pence>,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub annual_mileage: Option<u32>,
    /// Value score published by the competitor, where they expose one.
    #[serde(default)]
    pub external_value_score: Option<u8>,
    /// How many deals the competitor lists for this vehicle; demand proxy.
    #[serde(default)]
    pub deal_count: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub snapshot_id: String,
    pub snapshot_date: NaiveDate,
}

/// A competitor price movement between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDelta {
    pub source: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(default)]
    pub variant: Option<String>,
    /// Monthly price in the earlier snapshot, pence.
    pub previous_price: Pence,
    /// Monthly price in the later snapshot, pence.
    pub current_price: Pence,
    pub previous_snapshot_id: String,
    pub current_snapshot_id: String,
}

/// Rate-count statistics for one manufacturer/model, used as the demand
/// proxy when annotating gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandCount {
    pub manufacturer: String,
    pub model: String,
    pub rate_count: u32,
}

/// Read-only demand lookup keyed on normalized manufacturer/model.
///
/// Built once per invocation from the demand snapshot; plain immutable map,
/// not a stateful cache.
#[derive(Debug, Default)]
pub struct DemandIndex {
    counts: HashMap<(String, String), u32>,
}

impl DemandIndex {
    /// Build the index from raw demand rows, folding duplicate keys together.
    pub fn from_counts(counts: &[DemandCount]) -> Self {
        let mut index: HashMap<(String, String), u32> = HashMap::new();
        for row in counts {
            let key = (
                normalize_manufacturer(&row.manufacturer),
                normalize_model(&row.model),
            );
            *index.entry(key).or_default() += row.rate_count;
        }
        Self { counts: index }
    }

    /// Demand count for a manufacturer/model, 0 when absent.
    pub fn lookup(&self, manufacturer: &str, model: &str) -> u32 {
        let key = (
            normalize_manufacturer(manufacturer),
            normalize_model(model),
        );
        self.counts.get(&key).copied().unwrap_or(0)
    }
}

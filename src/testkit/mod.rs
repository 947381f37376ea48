//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests). Provides concise factories for domain records and
//! an in-memory [`SnapshotSource`] double so tests focus on assertions
//! rather than construction boilerplate.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    CapCode, CompetitorDeal, ContractType, DemandCount, Pence, PriceDelta, ProviderCode,
    RateRecord,
};
use crate::error::SnapshotError;
use crate::snapshot::SnapshotSource;

/// A live business-contract-hire rate with sensible defaults.
pub fn rate(manufacturer: &str, model: &str, total_rental: Pence) -> RateRecord {
    RateRecord {
        cap_code: CapCode::new(format!("{}-{}", manufacturer, model).replace(' ', "")),
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        variant: format!("{model} SE"),
        provider: ProviderCode::new("LEX"),
        contract_type: ContractType::BusinessContractHire,
        term_months: 36,
        annual_mileage: 10_000,
        total_rental,
        vehicle_value: 3_000_000,
        co2_gkm: 120,
        bik_percent: None,
        cached_score: None,
        fuel_type: Some("Petrol".to_string()),
        body_style: Some("Saloon".to_string()),
        snapshot_is_latest: true,
    }
}

/// A competitor deal with sensible defaults.
pub fn deal(manufacturer: &str, model: &str, monthly_price: Pence) -> CompetitorDeal {
    CompetitorDeal {
        source: "leasecomp".to_string(),
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        variant: None,
        monthly_price,
        initial_payment: None,
        term_months: Some(36),
        annual_mileage: Some(10_000),
        external_value_score: None,
        deal_count: 5,
        image_url: None,
        snapshot_id: "snap-1".to_string(),
        snapshot_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
    }
}

/// A competitor price movement with sensible defaults.
pub fn delta(manufacturer: &str, model: &str, previous: Pence, current: Pence) -> PriceDelta {
    PriceDelta {
        source: "leasecomp".to_string(),
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        variant: None,
        previous_price: previous,
        current_price: current,
        previous_snapshot_id: "snap-0".to_string(),
        current_snapshot_id: "snap-1".to_string(),
    }
}

/// In-memory [`SnapshotSource`] that serves pre-canned collections, with
/// optional injected failure and latency for exercising the gather step.
#[derive(Debug, Default)]
pub struct StaticSource {
    rates: Vec<RateRecord>,
    deals: Vec<CompetitorDeal>,
    unmatched: Vec<CompetitorDeal>,
    deltas: Vec<PriceDelta>,
    demand: Vec<DemandCount>,
    fail_deals: bool,
    delay: Option<Duration>,
}

impl StaticSource {
    pub fn with_rates(mut self, rates: Vec<RateRecord>) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_deals(mut self, deals: Vec<CompetitorDeal>) -> Self {
        self.deals = deals;
        self
    }

    pub fn with_unmatched(mut self, unmatched: Vec<CompetitorDeal>) -> Self {
        self.unmatched = unmatched;
        self
    }

    pub fn with_deltas(mut self, deltas: Vec<PriceDelta>) -> Self {
        self.deltas = deltas;
        self
    }

    pub fn with_demand(mut self, demand: Vec<DemandCount>) -> Self {
        self.demand = demand;
        self
    }

    /// Make the competitor-deal fetch fail.
    pub fn with_failing_deals(mut self) -> Self {
        self.fail_deals = true;
        self
    }

    /// Delay every fetch, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn rate_book(&self) -> Result<Vec<RateRecord>, SnapshotError> {
        self.pause().await;
        Ok(self.rates.clone())
    }

    async fn competitor_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError> {
        self.pause().await;
        if self.fail_deals {
            return Err(SnapshotError::ReadFile {
                path: "competitor_deals".into(),
                source: std::io::Error::other("injected failure"),
            });
        }
        Ok(self.deals.clone())
    }

    async fn unmatched_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError> {
        self.pause().await;
        Ok(self.unmatched.clone())
    }

    async fn price_deltas(&self) -> Result<Vec<PriceDelta>, SnapshotError> {
        self.pause().await;
        Ok(self.deltas.clone())
    }

    async fn demand_counts(&self) -> Result<Vec<DemandCount>, SnapshotError> {
        self.pause().await;
        Ok(self.demand.clone())
    }
}

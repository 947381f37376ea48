//! Snapshot gathering: the only I/O boundary in the crate.
//!
//! The classification pass needs five mutually consistent inputs. They are
//! fetched concurrently (fan-out) and joined before the pure pass runs
//! (fan-in); if any fetch fails or the time budget expires, the whole run
//! is abandoned rather than composing a partial result.

mod file;

pub use file::FileSource;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    CompetitorDeal, ContractType, DemandCount, IntelligenceInputs, PriceDelta, RateRecord,
};
use crate::error::SnapshotError;

/// A source of materialized input snapshots.
///
/// Implementations own where the data actually lives (files, a database, a
/// scraper's output bucket); the engine only sees fully loaded collections.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// The full latest rate book, all contract types.
    async fn rate_book(&self) -> Result<Vec<RateRecord>, SnapshotError>;

    /// Live rates for one contract type.
    async fn our_rates(
        &self,
        contract_type: ContractType,
    ) -> Result<Vec<RateRecord>, SnapshotError> {
        let mut rates = self.rate_book().await?;
        rates.retain(|r| r.is_live(contract_type));
        Ok(rates)
    }

    async fn competitor_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError>;

    /// Deals already known to lack an internal counterpart.
    async fn unmatched_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError>;

    async fn price_deltas(&self) -> Result<Vec<PriceDelta>, SnapshotError>;

    async fn demand_counts(&self) -> Result<Vec<DemandCount>, SnapshotError>;
}

/// Fan out the five snapshot fetches and join them under one time budget.
///
/// All-or-nothing: the first failure (or the budget expiring) aborts the
/// run with a single error.
pub async fn gather(
    source: &dyn SnapshotSource,
    contract_type: ContractType,
    budget: Duration,
) -> Result<IntelligenceInputs, SnapshotError> {
    let fetch = async {
        tokio::try_join!(
            source.our_rates(contract_type),
            source.competitor_deals(),
            source.unmatched_deals(),
            source.price_deltas(),
            source.demand_counts(),
        )
    };

    let (our_rates, competitor_deals, unmatched_deals, price_deltas, demand_counts) =
        tokio::time::timeout(budget, fetch)
            .await
            .map_err(|_| SnapshotError::TimedOut { budget })??;

    Ok(IntelligenceInputs {
        our_rates,
        competitor_deals,
        unmatched_deals,
        price_deltas,
        demand_counts,
    })
}

//! Application orchestration.
//!
//! Glue between the snapshot boundary and the pure domain passes: gather
//! everything, stamp the clock, run the synchronous transform. Scheduling,
//! caching and presentation stay with the caller.

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::domain::{
    build_heatmap, run_intelligence, ContractType, HeatmapRequest, HeatmapResult,
    IntelligenceResult,
};
use crate::error::{Result, SnapshotError};
use crate::snapshot::{gather, SnapshotSource};

/// One-shot intelligence and heatmap runs over a snapshot source.
pub struct App;

impl App {
    /// Gather all snapshots and run the full classification pass.
    pub async fn run_comparison(
        config: &Config,
        source: &dyn SnapshotSource,
        contract_type: ContractType,
    ) -> Result<IntelligenceResult> {
        let budget = config.snapshots.fetch_budget();
        info!(%contract_type, ?budget, "Gathering comparison snapshots");

        let inputs = gather(source, contract_type, budget).await?;
        info!(
            our_rates = inputs.our_rates.len(),
            competitor_deals = inputs.competitor_deals.len(),
            price_deltas = inputs.price_deltas.len(),
            "Snapshots gathered"
        );

        let scorer = config.scoring.scorer();
        let result = run_intelligence(
            &inputs,
            contract_type,
            config.matching,
            &scorer,
            Utc::now(),
        );
        info!(
            opportunities = result.opportunities.len(),
            threats = result.threats.len(),
            gaps = result.gaps.len(),
            "Classification complete"
        );
        Ok(result)
    }

    /// Load the rate book and build a comparison grid.
    pub async fn run_heatmap(
        config: &Config,
        source: &dyn SnapshotSource,
        request: &HeatmapRequest,
    ) -> Result<HeatmapResult> {
        let budget = config.snapshots.fetch_budget();
        let rates = tokio::time::timeout(budget, source.rate_book())
            .await
            .map_err(|_| SnapshotError::TimedOut { budget })??;
        info!(rates = rates.len(), "Rate book loaded");

        let scorer = config.scoring.scorer();
        Ok(build_heatmap(&rates, request, &scorer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnMode, HeatmapFilter, Metric, RowMode};
    use crate::testkit;

    #[tokio::test]
    async fn comparison_runs_end_to_end() {
        let source = testkit::StaticSource::default()
            .with_rates(vec![testkit::rate("BMW", "3 Series", 40_000)])
            .with_deals(vec![testkit::deal("BMW", "3 Series", 45_000)]);

        let result = App::run_comparison(
            &Config::default(),
            &source,
            ContractType::BusinessContractHire,
        )
        .await
        .unwrap();

        assert_eq!(result.opportunities.len(), 1);
        assert_eq!(result.metadata.our_rates_count, 1);
    }

    #[tokio::test]
    async fn comparison_fails_whole_run_on_fetch_error() {
        let source = testkit::StaticSource::default()
            .with_rates(vec![testkit::rate("BMW", "3 Series", 40_000)])
            .with_failing_deals();

        let result = App::run_comparison(
            &Config::default(),
            &source,
            ContractType::BusinessContractHire,
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn heatmap_runs_over_the_rate_book() {
        let source = testkit::StaticSource::default()
            .with_rates(vec![testkit::rate("BMW", "3 Series", 40_000)]);

        let request = HeatmapRequest {
            filter: HeatmapFilter::default(),
            rows: RowMode::PerVehicle,
            columns: ColumnMode::Providers,
            metric: Metric::BestPrice,
        };
        let result = App::run_heatmap(&Config::default(), &source, &request)
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.columns.len(), 1);
    }
}

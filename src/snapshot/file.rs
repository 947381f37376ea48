//! JSON-file snapshot adapter.
//!
//! The ingestion and scraping pipelines drop their output as JSON files in
//! one directory per run; this adapter loads them. File names are fixed:
//! `rates.json`, `competitor_deals.json`, `unmatched_deals.json`,
//! `price_deltas.json`, `demand_counts.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::{CompetitorDeal, DemandCount, PriceDelta, RateRecord};
use crate::error::SnapshotError;

use super::SnapshotSource;

/// Snapshot source backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, SnapshotError> {
        let path = self.dir.join(name);
        let content =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| SnapshotError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse { path, source })
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn rate_book(&self) -> Result<Vec<RateRecord>, SnapshotError> {
        self.load("rates.json").await
    }

    async fn competitor_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError> {
        self.load("competitor_deals.json").await
    }

    async fn unmatched_deals(&self) -> Result<Vec<CompetitorDeal>, SnapshotError> {
        self.load("unmatched_deals.json").await
    }

    async fn price_deltas(&self) -> Result<Vec<PriceDelta>, SnapshotError> {
        self.load("price_deltas.json").await
    }

    async fn demand_counts(&self) -> Result<Vec<DemandCount>, SnapshotError> {
        self.load("demand_counts.json").await
    }
}

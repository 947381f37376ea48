//! Leaselens - lease-rate scoring and market-intelligence comparison.
//!
//! This crate tells a vehicle-leasing broker, for any vehicle, whether it
//! is cheaper or more expensive than the market, which popular vehicles it
//! does not yet offer, and which of its own rates are worth promoting.
//!
//! # Architecture
//!
//! The engine is a pure function of its input snapshots:
//!
//! - **`domain::score`** - ratio-based 0-100 value scoring with a
//!   salary-sacrifice decorator
//! - **`domain::normalize`** - manufacturer/model matching keys
//! - **`domain::classify`** - one sweep producing Opportunities, Threats,
//!   Gaps, Price Alerts and Feature Suggestions
//! - **`domain::heatmap`** - filtered min/max/count grids over the rate book
//!
//! The only I/O lives in [`snapshot`]: five independent snapshot fetches
//! fanned out concurrently and joined all-or-nothing before the pure pass
//! runs. Scheduling, persistence and presentation belong to callers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Pure types and transforms: scoring, matching, classification
//! - [`error`] - Error types for the crate
//! - [`snapshot`] - Snapshot source trait and the JSON-file adapter
//! - [`app`] - One-shot orchestration of gather + classify
//! - [`cli`] - Operator command definitions
//!
//! # Example
//!
//! ```no_run
//! use leaselens::app::App;
//! use leaselens::config::Config;
//! use leaselens::domain::ContractType;
//! use leaselens::snapshot::FileSource;
//!
//! # async fn demo() -> leaselens::error::Result<()> {
//! let config = Config::load_or_default("leaselens.toml")?;
//! let source = FileSource::new("snapshots");
//! let result =
//!     App::run_comparison(&config, &source, ContractType::BusinessContractHire).await?;
//! println!("{} opportunities", result.opportunities.len());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod snapshot;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

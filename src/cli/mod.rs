//! Command-line interface definitions.

pub mod check;
pub mod compare;
pub mod heatmap;
pub mod output;
pub mod score;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::domain::{ColumnMode, ContractType, Metric, Pence, RowMode};

/// Leaselens - lease-rate scoring and market-intelligence comparison.
#[derive(Parser, Debug)]
#[command(name = "leaselens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the market-intelligence comparison over the latest snapshots
    Compare(CompareArgs),

    /// Build a rate-book comparison grid
    Heatmap(HeatmapArgs),

    /// Score a single rental ad hoc
    Score(ScoreArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `leaselens check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file and echo the resolved scoring table
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "leaselens.toml")]
    pub config: PathBuf,
}

/// Arguments for the `compare` subcommand.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "leaselens.toml")]
    pub config: PathBuf,

    /// Override the snapshot directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Contract type to compare (BCH, PCH, SS)
    #[arg(long, default_value = "BCH")]
    pub contract_type: ContractType,

    /// Require exact model-name matches
    #[arg(long)]
    pub strict_models: bool,

    /// Emit the full result as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `heatmap` subcommand.
#[derive(Parser, Debug)]
pub struct HeatmapArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "leaselens.toml")]
    pub config: PathBuf,

    /// Override the snapshot directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Row dimension: per-vehicle or per-make-model
    #[arg(long, default_value = "per-vehicle")]
    pub rows: RowMode,

    /// Column dimension: providers or contract-types
    #[arg(long, default_value = "providers")]
    pub columns: ColumnMode,

    /// Cell metric: best-price, price-range or rate-count
    #[arg(long, default_value = "best-price")]
    pub metric: Metric,

    /// Contract types to include (repeatable; default all)
    #[arg(long = "contract-type")]
    pub contract_types: Vec<ContractType>,

    /// Manufacturers to include (repeatable)
    #[arg(long = "manufacturer")]
    pub manufacturers: Vec<String>,

    /// Providers to include (repeatable)
    #[arg(long = "provider")]
    pub providers: Vec<String>,

    /// Fuel types to include (repeatable)
    #[arg(long = "fuel")]
    pub fuel_types: Vec<String>,

    /// Body styles to include (repeatable)
    #[arg(long = "body")]
    pub body_styles: Vec<String>,

    /// Free-text search over manufacturer, model, variant and CAP code
    #[arg(long)]
    pub search: Option<String>,

    /// Minimum monthly price in pence
    #[arg(long)]
    pub min_price: Option<Pence>,

    /// Maximum monthly price in pence
    #[arg(long)]
    pub max_price: Option<Pence>,

    /// Minimum value score
    #[arg(long)]
    pub min_score: Option<u8>,

    /// Row cap (clamped to 20..=200)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Emit the grid as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `score` subcommand.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "leaselens.toml")]
    pub config: PathBuf,

    /// Monthly rental in pence
    #[arg(long)]
    pub rental: Pence,

    /// Contract term in months
    #[arg(long)]
    pub term: u32,

    /// P11D-equivalent vehicle value in pence
    #[arg(long)]
    pub value: Pence,

    /// Score as a salary-sacrifice contract
    #[arg(long)]
    pub salary_sacrifice: bool,

    /// Benefit-in-Kind percentage band
    #[arg(long)]
    pub bik_percent: Option<Decimal>,

    /// Monthly BIK tax burden in pence
    #[arg(long)]
    pub bik_tax: Option<Pence>,

    /// Treat the vehicle as zero-emission
    #[arg(long)]
    pub zero_emission: bool,
}

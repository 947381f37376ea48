//! Diagnostic checks.

use crate::cli::{output, ConfigPathArg};
use crate::config::Config;
use crate::error::Result;

/// Validate a configuration file and echo the resolved scoring setup.
pub fn config(args: ConfigPathArg) -> Result<()> {
    output::section("Configuration check");
    output::key_value("Path", args.config.display());

    if !args.config.exists() {
        output::warn("File not found; built-in defaults will be used.");
    }

    let config = Config::load_or_default(&args.config)?;
    output::ok("Configuration is valid.");

    output::section("Scoring table");
    for (ratio, score) in &config.scoring.breakpoints.points {
        output::key_value(&format!("ratio <= {ratio}%"), format!("score {score}"));
    }
    output::key_value("floor", config.scoring.breakpoints.floor);
    output::key_value("ratio ceiling", format!("{}%", config.scoring.breakpoints.ratio_ceiling));

    output::section("Bands");
    for band in &config.scoring.thresholds.bands {
        output::key_value(&band.band, format!("min {}", band.min));
    }
    output::key_value("good threshold", config.scoring.thresholds.good_minimum());

    output::section("Snapshots");
    output::key_value("Data dir", config.snapshots.data_dir.display());
    output::key_value("Fetch budget", format!("{}ms", config.snapshots.fetch_budget_ms));
    println!();
    Ok(())
}

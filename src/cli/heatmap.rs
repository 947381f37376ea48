//! The `heatmap` subcommand.

use tabled::{Table, Tabled};

use crate::app::App;
use crate::cli::{output, HeatmapArgs};
use crate::config::Config;
use crate::domain::{format_pounds, HeatmapFilter, HeatmapRequest, HeatmapResult, Metric};
use crate::error::Result;
use crate::snapshot::FileSource;

#[derive(Tabled)]
struct CellRow {
    #[tabled(rename = "Row")]
    row: String,
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Rates")]
    count: usize,
}

pub async fn run(args: HeatmapArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.snapshots.data_dir = dir;
    }
    config.init_logging();

    let request = HeatmapRequest {
        filter: HeatmapFilter {
            contract_types: args.contract_types,
            search: args.search,
            manufacturers: args.manufacturers,
            providers: args.providers,
            fuel_types: args.fuel_types,
            body_styles: args.body_styles,
            min_price: args.min_price,
            max_price: args.max_price,
            min_score: args.min_score,
            row_limit: args.limit,
        },
        rows: args.rows,
        columns: args.columns,
        metric: args.metric,
    };

    let source = FileSource::new(config.snapshots.data_dir.clone());
    let result = App::run_heatmap(&config, &source, &request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    render(&result);
    Ok(())
}

fn render(result: &HeatmapResult) {
    output::section(&format!(
        "Heatmap ({} rows x {} columns, {})",
        result.rows.len(),
        result.columns.len(),
        result.metric.as_str()
    ));

    if result.rows.is_empty() {
        output::note("No rates match the filter.");
        println!();
        return;
    }

    let labels: std::collections::HashMap<&str, &str> = result
        .rows
        .iter()
        .map(|r| (r.id.as_str(), r.label.as_str()))
        .collect();

    let rows: Vec<CellRow> = result
        .cells
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| CellRow {
            row: labels.get(c.row_id.as_str()).unwrap_or(&"").to_string(),
            column: c.column_id.clone(),
            value: match result.metric {
                Metric::RateCount => c.value.to_string(),
                _ => format_pounds(c.value),
            },
            min: c.min.map(format_pounds).unwrap_or_default(),
            max: c.max.map(format_pounds).unwrap_or_default(),
            count: c.count,
        })
        .collect();

    output::table(&Table::new(rows).to_string());
    println!();
}

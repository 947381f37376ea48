//! The `compare` subcommand: run the intelligence pass and render it.

use tabled::{Table, Tabled};

use crate::app::App;
use crate::cli::{output, CompareArgs};
use crate::config::Config;
use crate::domain::{format_pounds, IntelligenceResult};
use crate::error::Result;
use crate::snapshot::FileSource;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Theirs")]
    theirs: String,
    #[tabled(rename = "Ours")]
    ours: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Via")]
    via: String,
    #[tabled(rename = "Score")]
    score: String,
}

#[derive(Tabled)]
struct ThreatRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Theirs")]
    theirs: String,
    #[tabled(rename = "Ours")]
    ours: String,
    #[tabled(rename = "Behind by")]
    behind: String,
    #[tabled(rename = "Severity")]
    severity: &'static str,
}

#[derive(Tabled)]
struct GapRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Deals")]
    deals: u32,
    #[tabled(rename = "Popularity")]
    popularity: u32,
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Was")]
    was: String,
    #[tabled(rename = "Now")]
    now: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Trend")]
    trend: &'static str,
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Via")]
    via: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Score")]
    score: u8,
    #[tabled(rename = "Why")]
    why: String,
}

/// Run the comparison and print it.
pub async fn run(args: CompareArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.snapshots.data_dir = dir;
    }
    if args.strict_models {
        config.matching.strict_models = true;
    }
    config.init_logging();

    let source = FileSource::new(config.snapshots.data_dir.clone());
    let result = App::run_comparison(&config, &source, args.contract_type).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    render(&result);
    Ok(())
}

fn render(result: &IntelligenceResult) {
    output::section("Market intelligence");
    output::key_value("Competitor deals", result.metadata.competitor_deals_count);
    output::key_value("Our rates", result.metadata.our_rates_count);
    if let Some(id) = &result.metadata.snapshot_id {
        output::key_value("Snapshot", id);
    }
    if let Some(date) = result.metadata.snapshot_date {
        output::key_value("Snapshot date", date);
    }

    output::section(&format!("Opportunities ({})", result.opportunities.len()));
    if result.opportunities.is_empty() {
        output::note("No vehicles where we beat the market.");
    } else {
        let rows: Vec<OpportunityRow> = result
            .opportunities
            .iter()
            .map(|o| OpportunityRow {
                vehicle: format!("{} {}", o.manufacturer, o.model),
                source: o.source.clone(),
                theirs: format_pounds(o.competitor_price),
                ours: format_pounds(o.our_best_price),
                margin: format!("{}%", o.margin_percent),
                via: o
                    .matched_rates
                    .first()
                    .map(|r| r.provider.to_string())
                    .unwrap_or_default(),
                score: o
                    .matched_rates
                    .first()
                    .map(|r| r.score.to_string())
                    .unwrap_or_default(),
            })
            .collect();
        output::table(&Table::new(rows).to_string());
    }

    output::section(&format!("Threats ({})", result.threats.len()));
    if result.threats.is_empty() {
        output::ok("No competitor undercuts our matched rates.");
    } else {
        let rows: Vec<ThreatRow> = result
            .threats
            .iter()
            .map(|t| ThreatRow {
                vehicle: format!("{} {}", t.manufacturer, t.model),
                source: t.source.clone(),
                theirs: format_pounds(t.competitor_price),
                ours: format_pounds(t.our_best_price),
                behind: format!("{}%", t.difference_percent),
                severity: t.severity.as_str(),
            })
            .collect();
        output::table(&Table::new(rows).to_string());
    }

    output::section(&format!("Gaps ({})", result.gaps.len()));
    if result.gaps.is_empty() {
        output::ok("Every competitor vehicle has an internal counterpart.");
    } else {
        let rows: Vec<GapRow> = result
            .gaps
            .iter()
            .map(|g| GapRow {
                vehicle: format!("{} {}", g.manufacturer, g.model),
                source: g.source.clone(),
                price: format_pounds(g.competitor_price),
                deals: g.deal_count,
                popularity: g.popularity,
            })
            .collect();
        output::table(&Table::new(rows).to_string());
    }

    output::section(&format!("Price alerts ({})", result.price_alerts.len()));
    if result.price_alerts.is_empty() {
        output::note("No competitor price movement outside the noise band.");
    } else {
        let rows: Vec<AlertRow> = result
            .price_alerts
            .iter()
            .map(|a| AlertRow {
                vehicle: format!("{} {}", a.manufacturer, a.model),
                was: format_pounds(a.previous_price),
                now: format_pounds(a.current_price),
                change: format!("{}%", a.change_percent),
                trend: a.trend.as_str(),
            })
            .collect();
        output::table(&Table::new(rows).to_string());
    }

    output::section(&format!(
        "Worth promoting ({})",
        result.feature_suggestions.len()
    ));
    if result.feature_suggestions.is_empty() {
        output::note("No opportunity clears the promotion bar.");
    } else {
        let rows: Vec<SuggestionRow> = result
            .feature_suggestions
            .iter()
            .map(|s| SuggestionRow {
                vehicle: format!("{} {} {}", s.manufacturer, s.model, s.variant),
                via: s.provider.clone(),
                margin: format!("{}%", s.margin_percent),
                score: s.score,
                why: s.rationale.clone(),
            })
            .collect();
        output::table(&Table::new(rows).to_string());
    }
    println!();
}

//! The `score` subcommand: ad-hoc scoring for desk staff.

use crate::cli::{output, ScoreArgs};
use crate::config::Config;
use crate::domain::{format_pounds, SalarySacrificeInputs, Scorer};
use crate::error::Result;

pub fn run(args: ScoreArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let scorer = config.scoring.scorer();

    let result = if args.salary_sacrifice {
        scorer.score_salary_sacrifice(
            args.rental,
            args.term,
            args.value,
            SalarySacrificeInputs {
                bik_percent: args.bik_percent,
                bik_tax: args.bik_tax,
                zero_emission: args.zero_emission,
            },
        )
    } else {
        scorer.score(args.rental, args.term, args.value)
    };

    output::section("Value score");
    output::key_value("Rental", format_pounds(args.rental));
    output::key_value("Term", format!("{} months", args.term));
    output::key_value("Vehicle value", format_pounds(args.value));
    if let Some(ratio) = Scorer::cost_ratio_percent(args.rental, args.term, args.value) {
        output::key_value("Cost ratio", format!("{}%", ratio.round_dp(1)));
    }
    output::key_value("Score", result.score);
    output::key_value("Band", &result.band);
    println!();
    Ok(())
}

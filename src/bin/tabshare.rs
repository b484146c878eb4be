//! Demo CLI: run a split scenario file and print the outcome.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use tabshare::{
    scenario::Scenario,
    split::calculate_split,
    summary,
    validate::validate_split,
};

/// Split a bill described by a YAML scenario file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the scenario file
    scenario: PathBuf,

    /// Calculate even if the scenario fails validation
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scenario = Scenario::from_path(&args.scenario)
        .with_context(|| format!("could not load {}", args.scenario.display()))?;
    let currency = scenario.currency()?;

    let errors = validate_split(&scenario.bill, &scenario.members, &scenario.config);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("error: {error}");
        }
        if !args.force {
            bail!("scenario failed validation ({} problem(s))", errors.len());
        }
    }

    let result = calculate_split(&scenario.bill, &scenario.members, &scenario.config);

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    println!("{}", summary::member_table(&result, &scenario.members, currency));
    println!();
    println!("{}", summary::breakdown_table(&result, currency));
    println!();
    println!(
        "{}",
        summary::settlement_table(&result, &scenario.members, currency)
    );

    Ok(())
}

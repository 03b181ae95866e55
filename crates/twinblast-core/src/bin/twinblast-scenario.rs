//! Headless scenario runner.
//!
//! Usage: `twinblast-scenario <scenario.json>`. Prints the report as JSON on
//! stdout. Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use twinblast_core::scenario::{run_scenario, Scenario};

#[derive(Parser, Debug)]
#[command(name = "twinblast-scenario")]
#[command(about = "Run a TwinBlast scenario and print its report as JSON", long_about = None)]
#[command(version)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;
    tracing::info!(
        path = %args.scenario.display(),
        steps = scenario.step_count(),
        "running scenario"
    );
    let report = run_scenario(&scenario).context("running scenario")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn setup_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

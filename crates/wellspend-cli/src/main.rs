//! Wellspend CLI - How does spending track with wellbeing?
//!
//! Usage:
//!   wellspend weeks                        Weekly spending/wellbeing table
//!   wellspend correlate --top 5            Strongest correlations
//!   wellspend train                        Fit regression models
//!   wellspend predict --metric mood --set foodSpending=120
//!   wellspend simulate --scenarios s.json  What-if scenarios
//!   wellspend report --json                Full analysis

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let inputs = commands::InputPaths {
        transactions: cli.transactions.clone(),
        wellbeing: cli.wellbeing.clone(),
    };
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Weeks => commands::cmd_weeks(&inputs, &config),
        Commands::Correlate { top, all } => commands::cmd_correlate(&inputs, &config, top, all),
        Commands::Train => commands::cmd_train(&inputs, &config),
        Commands::Predict { metric, set } => {
            commands::cmd_predict(&inputs, &config, &metric, &set)
        }
        Commands::Simulate {
            scenarios,
            baseline_delta,
        } => commands::cmd_simulate(&inputs, &config, &scenarios, baseline_delta),
        Commands::Report { json } => commands::cmd_report(&inputs, &config, json),
    }
}

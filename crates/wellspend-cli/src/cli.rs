//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wellspend - See how your spending moves with how you feel
#[derive(Parser)]
#[command(name = "wellspend")]
#[command(about = "Correlate weekly spending with wellbeing check-ins", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transactions CSV (date,category,amount)
    #[arg(long, default_value = "transactions.csv", global = true)]
    pub transactions: PathBuf,

    /// Wellbeing check-ins CSV
    /// (date,overall_wellbeing,stress_level,sleep_quality,energy_level,mood)
    #[arg(long, default_value = "wellbeing.csv", global = true)]
    pub wellbeing: PathBuf,

    /// Analysis config TOML (defaults to the data-dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the weekly spending and wellbeing aggregates
    Weeks,

    /// Show correlations between spending and wellbeing
    Correlate {
        /// Number of moderate/strong correlations to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Show every correlation above the noise floor, including weak ones
        #[arg(long)]
        all: bool,
    },

    /// Fit a regression model for each wellbeing metric
    Train,

    /// Predict a wellbeing metric for a spending snapshot
    ///
    /// Metrics not given with --set use the average week.
    Predict {
        /// Wellbeing metric (overallWellbeing, stressLevel, sleepQuality, energyLevel, mood)
        #[arg(short, long)]
        metric: String,

        /// Spending override as metric=value, e.g. foodSpending=120 (repeatable)
        #[arg(short, long)]
        set: Vec<String>,
    },

    /// Run what-if scenarios from a JSON file
    Simulate {
        /// JSON array of {"name": ..., "deltas": {"foodSpending": -50}}
        #[arg(short, long)]
        scenarios: PathBuf,

        /// Judge impact against the unchanged baseline instead of raw predictions
        #[arg(long)]
        baseline_delta: bool,
    },

    /// Run the full analysis
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

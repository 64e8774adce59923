//! Shared utilities for loading inputs and configuration
//!
//! This module contains:
//! - `InputPaths` - Where the transaction and check-in CSVs live
//! - `load_config` - Resolve the analysis config
//! - `load_input` - Read both CSVs into an `AnalysisInput`
//! - `load_scenarios` - Read a scenario JSON file

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use wellspend_core::import::{parse_scenarios_json, parse_transactions_csv, parse_wellbeing_csv};
use wellspend_core::{AnalysisConfig, AnalysisInput, ScenarioSpec};

/// Input file locations shared by every command
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub transactions: PathBuf,
    pub wellbeing: PathBuf,
}

/// Explicit --config path, else the data-dir override, else built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => AnalysisConfig::load().context("Failed to load analysis config"),
    }
}

pub fn load_input(paths: &InputPaths) -> Result<AnalysisInput> {
    let file = File::open(&paths.transactions).with_context(|| {
        format!(
            "Failed to open transactions file {}",
            paths.transactions.display()
        )
    })?;
    let transactions = parse_transactions_csv(file).with_context(|| {
        format!(
            "Failed to parse transactions from {}",
            paths.transactions.display()
        )
    })?;

    let file = File::open(&paths.wellbeing).with_context(|| {
        format!("Failed to open wellbeing file {}", paths.wellbeing.display())
    })?;
    let wellbeing = parse_wellbeing_csv(file).with_context(|| {
        format!(
            "Failed to parse wellbeing entries from {}",
            paths.wellbeing.display()
        )
    })?;

    debug!(
        transactions = transactions.len(),
        wellbeing = wellbeing.len(),
        "Loaded input files"
    );

    Ok(AnalysisInput {
        transactions,
        wellbeing,
        scenarios: Vec::new(),
    })
}

pub fn load_scenarios(path: &Path) -> Result<Vec<ScenarioSpec>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open scenarios file {}", path.display()))?;
    parse_scenarios_json(file)
        .with_context(|| format!("Failed to parse scenarios from {}", path.display()))
}

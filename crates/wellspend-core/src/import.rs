//! Loaders for transaction, check-in and scenario files
//!
//! Readers rather than paths, so callers decide where data comes from.
//!
//! Transactions CSV: `date,category,amount`
//! Wellbeing CSV: `date,overall_wellbeing,stress_level,sleep_quality,energy_level,mood`
//! Dates are `YYYY-MM-DD`.

use std::io::Read;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{FinancialMetric, FinancialSnapshot, Transaction, WellbeingEntry};
use crate::scenario::ScenarioSpec;

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Parse transactions; negative or non-finite amounts are rejected
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv_reader(reader);
    let mut transactions = Vec::new();

    for (i, result) in rdr.deserialize::<Transaction>().enumerate() {
        let tx = result?;
        // Header is line 1
        let line = i + 2;

        if !tx.amount.is_finite() {
            return Err(Error::Import(format!("Line {}: amount is not a number", line)));
        }
        if tx.amount < 0.0 {
            return Err(Error::Import(format!(
                "Line {}: negative amount {} (amounts are money spent)",
                line, tx.amount
            )));
        }
        transactions.push(tx);
    }

    debug!(count = transactions.len(), "Parsed transactions");
    Ok(transactions)
}

/// Parse wellbeing check-ins
pub fn parse_wellbeing_csv<R: Read>(reader: R) -> Result<Vec<WellbeingEntry>> {
    let mut rdr = csv_reader(reader);
    let mut entries = Vec::new();

    for (i, result) in rdr.deserialize::<WellbeingEntry>().enumerate() {
        let entry = result?;
        let line = i + 2;

        let values = [
            entry.overall_wellbeing,
            entry.stress_level,
            entry.sleep_quality,
            entry.energy_level,
            entry.mood,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Import(format!("Line {}: rating is not a number", line)));
        }
        entries.push(entry);
    }

    debug!(count = entries.len(), "Parsed wellbeing entries");
    Ok(entries)
}

/// Parse a JSON array of `{"name": ..., "deltas": {"foodSpending": -50}}`
pub fn parse_scenarios_json<R: Read>(reader: R) -> Result<Vec<ScenarioSpec>> {
    let scenarios: Vec<ScenarioSpec> = serde_json::from_reader(reader)?;

    for scenario in &scenarios {
        if scenario.name.trim().is_empty() {
            return Err(Error::Import("Scenario name cannot be empty".into()));
        }
        if scenario.deltas.values().any(|v| !v.is_finite()) {
            return Err(Error::Import(format!(
                "Scenario '{}' has a non-numeric delta",
                scenario.name
            )));
        }
    }

    Ok(scenarios)
}

/// Parse `metric=value` assignments into a snapshot
pub fn parse_snapshot_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<FinancialSnapshot> {
    let mut snapshot = FinancialSnapshot::new();

    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            Error::InvalidData(format!("Expected metric=value, got '{}'", assignment))
        })?;
        let metric: FinancialMetric = name.trim().parse().map_err(Error::InvalidData)?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidData(format!("Invalid number in '{}'", assignment)))?;
        if !value.is_finite() {
            return Err(Error::InvalidData(format!(
                "Value in '{}' is not a finite number",
                assignment
            )));
        }
        snapshot.insert(metric, value);
    }

    Ok(snapshot)
}

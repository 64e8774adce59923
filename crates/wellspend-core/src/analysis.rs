//! End-to-end analysis pipeline
//!
//! Runs aggregate → correlate → train → predict/simulate in one call and
//! packages the results into an [`AnalysisReport`]. The report can also
//! flatten itself into pre-computed summaries for an external language
//! service to narrate; nothing here talks to that service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::aggregate_weekly_with;
use crate::config::AnalysisConfig;
use crate::correlation::{
    analyze_correlations_with, top_correlations, CorrelationResult, MIN_WEEKS_FOR_CORRELATION,
};
use crate::error::Result;
use crate::models::{
    mean_snapshot, FinancialSnapshot, Transaction, WeeklyAggregate, WellbeingEntry,
    WellbeingMetric,
};
use crate::regression::{predict, train_models, PredictionResult, TrainedModels};
use crate::scenario::{simulate_scenarios_with, ScenarioSpec, WhatIfScenario};

/// Raw inputs for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub transactions: Vec<Transaction>,
    pub wellbeing: Vec<WellbeingEntry>,
    pub scenarios: Vec<ScenarioSpec>,
}

/// Everything one analysis run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub weeks: Vec<WeeklyAggregate>,
    /// All correlations above the noise floor, strongest first
    pub correlations: Vec<CorrelationResult>,
    /// The moderate/strong subset used as regression features
    pub significant: Vec<CorrelationResult>,
    pub models: TrainedModels,
    /// Mean weekly spending, the starting point for predictions and scenarios
    pub baseline: FinancialSnapshot,
    pub baseline_predictions: BTreeMap<WellbeingMetric, PredictionResult>,
    pub scenarios: Vec<WhatIfScenario>,
    pub warnings: Vec<String>,
}

/// Run the full pipeline.
///
/// Only a non-singular hard failure (e.g. a malformed matrix) is an error;
/// missing data and untrainable metrics show up as warnings.
pub fn run_analysis(input: &AnalysisInput, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let mut warnings = Vec::new();

    let weeks = aggregate_weekly_with(&input.transactions, &input.wellbeing, &config.aggregation);
    if weeks.len() < MIN_WEEKS_FOR_CORRELATION {
        warnings.push(format!(
            "Only {} week(s) with both spending and wellbeing data; at least {} are needed",
            weeks.len(),
            MIN_WEEKS_FOR_CORRELATION
        ));
    }

    let correlations = analyze_correlations_with(&weeks, &config.correlation);
    let significant = top_correlations(&correlations, config.correlation.top_limit);
    if !correlations.is_empty() && significant.is_empty() {
        warnings.push("No moderate or strong correlations found".to_string());
    }

    let models = train_models(&weeks, &significant)?;
    for (metric, reason) in &models.skipped {
        if significant.iter().any(|c| c.wellbeing_metric == *metric) {
            warn!(metric = %metric, reason = %reason, "No model for wellbeing metric");
            warnings.push(format!("No model for {}: {}", metric, reason));
        }
    }

    let baseline = mean_snapshot(&weeks);
    let baseline_predictions = models
        .models
        .iter()
        .map(|(metric, model)| (*metric, predict(model, &baseline)))
        .collect();

    let scenarios =
        simulate_scenarios_with(&models.models, &baseline, &input.scenarios, &config.scenario);

    info!(
        weeks = weeks.len(),
        correlations = correlations.len(),
        models = models.models.len(),
        scenarios = scenarios.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        weeks,
        correlations,
        significant,
        models,
        baseline,
        baseline_predictions,
        scenarios,
        warnings,
    })
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pre-computed summaries keyed by template variable name, ready to hand
    /// to a language service as structured input
    pub fn insight_context(&self) -> BTreeMap<&'static str, String> {
        let mut vars = BTreeMap::new();

        vars.insert("week_count", self.weeks.len().to_string());
        if let (Some(first), Some(last)) = (self.weeks.first(), self.weeks.last()) {
            vars.insert("period", format!("{} to {}", first.week, last.week));
        }

        if !self.significant.is_empty() {
            let lines = self
                .significant
                .iter()
                .map(|c| {
                    format!(
                        "{} vs {}: {:.3} ({}, {})",
                        c.financial_metric,
                        c.wellbeing_metric,
                        c.correlation,
                        c.strength,
                        c.direction
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            vars.insert("top_correlations", lines);
        }

        if !self.models.models.is_empty() {
            let lines = self
                .models
                .models
                .values()
                .map(|m| {
                    let features: Vec<&str> = m.feature_names.iter().map(|f| f.as_str()).collect();
                    format!(
                        "{} from [{}]: R²={:.3} ({} confidence)",
                        m.target_metric,
                        features.join(", "),
                        m.r_squared,
                        m.confidence()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            vars.insert("models", lines);
        }

        if !self.baseline_predictions.is_empty() {
            let lines = self
                .baseline_predictions
                .iter()
                .map(|(metric, p)| format!("{}: {:.2}", metric, p.predicted_value))
                .collect::<Vec<_>>()
                .join("\n");
            vars.insert("baseline_predictions", lines);
        }

        if !self.scenarios.is_empty() {
            let lines = self
                .scenarios
                .iter()
                .map(|s| format!("{}: {}", s.name, s.recommendation))
                .collect::<Vec<_>>()
                .join("\n");
            vars.insert("scenarios", lines);
        }

        if !self.warnings.is_empty() {
            vars.insert("warnings", self.warnings.join("\n"));
        }

        vars
    }
}

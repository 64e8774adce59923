//! What-if simulation of spending changes
//!
//! A scenario is a named set of signed deltas applied to a baseline snapshot.
//! Every trained model predicts against the modified snapshot and the
//! results are summarized into a short recommendation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RecommendationBasis, ScenarioConfig};
use crate::models::{snapshot_value, FinancialSnapshot, WellbeingMetric};
use crate::regression::{predict, PredictionResult, RegressionModel};

/// A hypothetical change to spending, e.g. "cut shopping by 100"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(alias = "financial_deltas")]
    pub deltas: FinancialSnapshot,
}

impl ScenarioSpec {
    pub fn new(name: impl Into<String>, deltas: FinancialSnapshot) -> Self {
        Self {
            name: name.into(),
            deltas,
        }
    }
}

/// Outcome of simulating one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub name: String,
    pub financial_deltas: FinancialSnapshot,
    pub predicted_impact: BTreeMap<WellbeingMetric, PredictionResult>,
    pub recommendation: String,
}

/// Baseline plus deltas; metrics missing from the baseline start at 0
pub fn apply_deltas(baseline: &FinancialSnapshot, deltas: &FinancialSnapshot) -> FinancialSnapshot {
    let mut modified = baseline.clone();
    for (metric, delta) in deltas {
        modified.insert(*metric, snapshot_value(baseline, *metric) + delta);
    }
    modified
}

/// Simulate with default settings (recommendation from absolute predictions)
pub fn simulate_scenarios(
    models: &BTreeMap<WellbeingMetric, RegressionModel>,
    baseline: &FinancialSnapshot,
    scenarios: &[ScenarioSpec],
) -> Vec<WhatIfScenario> {
    simulate_scenarios_with(models, baseline, scenarios, &ScenarioConfig::default())
}

pub fn simulate_scenarios_with(
    models: &BTreeMap<WellbeingMetric, RegressionModel>,
    baseline: &FinancialSnapshot,
    scenarios: &[ScenarioSpec],
    config: &ScenarioConfig,
) -> Vec<WhatIfScenario> {
    let baseline_predictions: BTreeMap<WellbeingMetric, f64> = match config.basis {
        RecommendationBasis::Absolute => BTreeMap::new(),
        RecommendationBasis::BaselineDelta => models
            .iter()
            .map(|(metric, model)| (*metric, predict(model, baseline).predicted_value))
            .collect(),
    };

    scenarios
        .iter()
        .map(|scenario| {
            let modified = apply_deltas(baseline, &scenario.deltas);
            let predicted_impact: BTreeMap<WellbeingMetric, PredictionResult> = models
                .iter()
                .map(|(metric, model)| (*metric, predict(model, &modified)))
                .collect();

            let scores: Vec<(WellbeingMetric, f64)> = predicted_impact
                .iter()
                .map(|(metric, prediction)| {
                    let reference = baseline_predictions.get(metric).copied().unwrap_or(0.0);
                    (*metric, prediction.predicted_value - reference)
                })
                .collect();

            let recommendation = render_recommendation(&scores, config);
            debug!(scenario = %scenario.name, models = models.len(), "Simulated scenario");

            WhatIfScenario {
                name: scenario.name.clone(),
                financial_deltas: scenario.deltas.clone(),
                predicted_impact,
                recommendation,
            }
        })
        .collect()
}

/// Summarize scores into positive/negative impact lists plus a verdict.
///
/// Under [`RecommendationBasis::Absolute`] the score is the raw prediction,
/// which for 1-10 ratings is nearly always above the threshold.
fn render_recommendation(scores: &[(WellbeingMetric, f64)], config: &ScenarioConfig) -> String {
    let threshold = config.impact_threshold;
    let format_value = |v: f64| match config.basis {
        RecommendationBasis::Absolute => format!("{:.2}", v),
        RecommendationBasis::BaselineDelta => format!("{:+.2}", v),
    };

    let positive: Vec<String> = scores
        .iter()
        .filter(|(_, v)| *v > threshold)
        .map(|(m, v)| format!("{} ({})", m, format_value(*v)))
        .collect();
    let negative: Vec<String> = scores
        .iter()
        .filter(|(_, v)| *v < -threshold)
        .map(|(m, v)| format!("{} ({})", m, format_value(*v)))
        .collect();

    let mut parts = Vec::new();
    if !positive.is_empty() {
        parts.push(format!("Positive impact on {}.", positive.join(", ")));
    }
    if !negative.is_empty() {
        parts.push(format!("Negative impact on {}.", negative.join(", ")));
    }

    let verdict = match positive.len().cmp(&negative.len()) {
        std::cmp::Ordering::Greater => {
            "This change is likely to improve your overall wellbeing."
        }
        std::cmp::Ordering::Less => {
            "This change may lower your overall wellbeing. Consider adjusting it."
        }
        std::cmp::Ordering::Equal => "This change has mixed impacts on your wellbeing.",
    };
    parts.push(verdict.to_string());

    parts.join(" ")
}

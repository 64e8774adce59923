//! What-if scenario command

use std::path::Path;

use anyhow::{Context, Result};
use wellspend_core::{
    run_analysis, AnalysisConfig, PredictionResult, RecommendationBasis, WellbeingMetric,
};

use super::{load_input, load_scenarios, truncate, InputPaths};

pub fn cmd_simulate(
    inputs: &InputPaths,
    config: &AnalysisConfig,
    scenarios_path: &Path,
    baseline_delta: bool,
) -> Result<()> {
    let mut input = load_input(inputs)?;
    input.scenarios = load_scenarios(scenarios_path)?;

    let mut config = config.clone();
    if baseline_delta {
        config.scenario.basis = RecommendationBasis::BaselineDelta;
    }

    let report = run_analysis(&input, &config).context("Scenario simulation failed")?;

    println!();
    println!("🧪 What-If Scenarios");
    println!("   Impact basis: {}", config.scenario.basis.as_str());
    println!("   ─────────────────────────────────────────────────────────────");

    if report.models.models.is_empty() {
        println!("   No trained models, so no predictions can be made.");
        for warning in &report.warnings {
            println!("   ⚠️  {}", warning);
        }
        return Ok(());
    }

    for scenario in &report.scenarios {
        println!();
        println!("   ▶ {}", truncate(&scenario.name, 60));

        let deltas: Vec<String> = scenario
            .financial_deltas
            .iter()
            .map(|(metric, delta)| format!("{} {:+.2}", metric, delta))
            .collect();
        if deltas.is_empty() {
            println!("     Changes: none");
        } else {
            println!("     Changes: {}", deltas.join(", "));
        }

        for (metric, prediction) in &scenario.predicted_impact {
            let baseline = report
                .baseline_predictions
                .get(metric)
                .map(|p| p.predicted_value)
                .unwrap_or(prediction.predicted_value);
            println!("{}", format_scenario_line(*metric, prediction, baseline));
        }

        println!("     💡 {}", scenario.recommendation);
    }

    Ok(())
}

/// One metric's scenario outcome on its rating scale, with the change from
/// the average week (`baseline` is the oriented baseline prediction)
pub(crate) fn format_scenario_line(
    metric: WellbeingMetric,
    prediction: &PredictionResult,
    baseline: f64,
) -> String {
    let value = metric.from_oriented(prediction.predicted_value);
    format!(
        "     {:18} {:>6.2}  ({:+.2} vs average week, {} confidence)",
        metric.as_str(),
        value,
        value - metric.from_oriented(baseline),
        prediction.confidence
    )
}

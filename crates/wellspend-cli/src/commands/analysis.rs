//! Analysis command implementations

use anyhow::{Context, Result};
use wellspend_core::import::parse_snapshot_assignments;
use wellspend_core::models::mean_snapshot;
use wellspend_core::{
    aggregate_weekly_with, analyze_correlations_with, predict, run_analysis, top_correlations,
    train_model, train_models, AnalysisConfig, CorrelationResult, CorrelationStrength,
    PredictionResult, TrainedModels, WeeklyAggregate, WellbeingMetric,
};

use super::{load_input, InputPaths};

fn load_weeks(inputs: &InputPaths, config: &AnalysisConfig) -> Result<Vec<WeeklyAggregate>> {
    let input = load_input(inputs)?;
    Ok(aggregate_weekly_with(
        &input.transactions,
        &input.wellbeing,
        &config.aggregation,
    ))
}

pub fn cmd_weeks(inputs: &InputPaths, config: &AnalysisConfig) -> Result<()> {
    let weeks = load_weeks(inputs, config)?;

    println!();
    println!("📅 Weekly Aggregates");
    println!("   ─────────────────────────────────────────────────────────────────────");

    if weeks.is_empty() {
        println!("   No weeks with both spending and a wellbeing check-in.");
        return Ok(());
    }

    println!(
        "   {:8} │ {:>9} │ {:>8} │ {:>8} │ {:>8} │ {:>7} │ {:>6} │ {:>4}",
        "Week", "Total", "Food", "Shopping", "Anomaly", "Overall", "Stress", "Mood"
    );
    println!("   ─────────┼───────────┼──────────┼──────────┼──────────┼─────────┼────────┼──────");

    for week in &weeks {
        let f = &week.financial;
        let w = &week.wellbeing;
        println!(
            "   {:8} │ {:>9.2} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>7.1} │ {:>6.1} │ {:>4.1}",
            week.week.as_str(),
            f.total_spending,
            f.food_spending,
            f.shopping_spending,
            f.anomaly_spending,
            w.overall_wellbeing,
            w.stress_level,
            w.mood
        );
    }

    println!();
    println!("   {} weeks", weeks.len());

    Ok(())
}

pub fn cmd_correlate(
    inputs: &InputPaths,
    config: &AnalysisConfig,
    top: Option<usize>,
    all: bool,
) -> Result<()> {
    let weeks = load_weeks(inputs, config)?;
    let correlations = analyze_correlations_with(&weeks, &config.correlation);

    let shown = if all {
        correlations
    } else {
        top_correlations(
            &correlations,
            top.unwrap_or(config.correlation.top_limit),
        )
    };

    println!();
    println!("🔗 Spending ↔ Wellbeing Correlations ({} weeks)", weeks.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if shown.is_empty() {
        if weeks.len() < wellspend_core::correlation::MIN_WEEKS_FOR_CORRELATION {
            println!(
                "   Not enough data: {} week(s), need at least {}.",
                weeks.len(),
                wellspend_core::correlation::MIN_WEEKS_FOR_CORRELATION
            );
        } else {
            println!("   No notable correlations found.");
        }
        return Ok(());
    }

    print_correlations(&shown);
    Ok(())
}

pub fn cmd_train(inputs: &InputPaths, config: &AnalysisConfig) -> Result<()> {
    let weeks = load_weeks(inputs, config)?;
    let correlations = analyze_correlations_with(&weeks, &config.correlation);
    let significant = top_correlations(&correlations, config.correlation.top_limit);
    let trained = train_models(&weeks, &significant).context("Model training failed")?;

    println!();
    println!("🧮 Regression Models ({} weeks)", weeks.len());
    println!("   ─────────────────────────────────────────────────────────────");
    print_models(&trained);

    Ok(())
}

pub fn cmd_predict(
    inputs: &InputPaths,
    config: &AnalysisConfig,
    metric: &str,
    assignments: &[String],
) -> Result<()> {
    let target: WellbeingMetric = metric.parse().map_err(anyhow::Error::msg)?;
    let overrides = parse_snapshot_assignments(assignments)?;

    let weeks = load_weeks(inputs, config)?;
    let correlations = analyze_correlations_with(&weeks, &config.correlation);
    let significant = top_correlations(&correlations, config.correlation.top_limit);

    let model = train_model(&weeks, target, &significant)
        .with_context(|| format!("Failed to train a model for {}", target))?
        .with_context(|| {
            format!(
                "No model for {}: no significant spending correlation or too few weeks",
                target
            )
        })?;

    let mut snapshot = mean_snapshot(&weeks);
    snapshot.extend(overrides);
    let prediction = predict(&model, &snapshot);

    println!();
    println!("🔮 Prediction for {}", target);
    println!("   ─────────────────────────────");
    for feature in &model.feature_names {
        println!(
            "   {:20} {:>10.2}",
            feature.as_str(),
            snapshot.get(feature).copied().unwrap_or(0.0)
        );
    }
    println!();
    print_prediction(target, &prediction);

    Ok(())
}

pub fn cmd_report(inputs: &InputPaths, config: &AnalysisConfig, json: bool) -> Result<()> {
    let input = load_input(inputs)?;
    let report = run_analysis(&input, config).context("Analysis failed")?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!();
    println!("📊 Wellspend Report");
    if let (Some(first), Some(last)) = (report.weeks.first(), report.weeks.last()) {
        println!(
            "   Period: {} to {} ({} weeks)",
            first.week,
            last.week,
            report.weeks.len()
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");

    println!();
    println!("🔗 Top Correlations");
    if report.significant.is_empty() {
        println!("   None");
    } else {
        print_correlations(&report.significant);
    }

    println!();
    println!("🧮 Models");
    print_models(&report.models);

    if !report.baseline_predictions.is_empty() {
        println!();
        println!("🔮 At Your Average Week");
        for (metric, prediction) in &report.baseline_predictions {
            print_prediction(*metric, prediction);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("⚠️  {}", warning);
        }
    }

    Ok(())
}

pub(crate) fn print_correlations(correlations: &[CorrelationResult]) {
    println!(
        "   {:22} │ {:18} │ {:>7} │ {:8} │ {}",
        "Spending", "Wellbeing", "r", "Strength", "Direction"
    );
    println!("   ───────────────────────┼────────────────────┼─────────┼──────────┼──────────");
    for c in correlations {
        let marker = match c.strength {
            CorrelationStrength::Strong => "🔥",
            CorrelationStrength::Moderate => "  ",
            CorrelationStrength::Weak => "  ",
        };
        println!(
            "   {:22} │ {:18} │ {:>7.3} │ {:8} │ {} {}",
            c.financial_metric.as_str(),
            c.wellbeing_metric.as_str(),
            c.correlation,
            c.strength.as_str(),
            c.direction.as_str(),
            marker
        );
    }
}

pub(crate) fn print_models(trained: &TrainedModels) {
    if trained.models.is_empty() && trained.skipped.is_empty() {
        println!("   No models trained.");
        return;
    }

    for model in trained.models.values() {
        let terms: Vec<String> = model
            .feature_names
            .iter()
            .zip(&model.coefficients)
            .map(|(f, c)| format!("{:+.3}·{}", c, f))
            .collect();
        println!(
            "   ✅ {:18} R²={:.3} ({} confidence, {} weeks)",
            model.target_metric.as_str(),
            model.r_squared,
            model.confidence(),
            model.training_weeks
        );
        println!("      = {:.3} {}", model.intercept, terms.join(" "));
    }

    for (metric, reason) in &trained.skipped {
        println!("   ⏭️  {:18} {}", metric.as_str(), reason);
    }
}

pub(crate) fn print_prediction(metric: WellbeingMetric, prediction: &PredictionResult) {
    for line in format_prediction(metric, prediction) {
        println!("{}", line);
    }
}

/// Prediction lines on the metric's own rating scale.
///
/// Models predict stress flipped (higher = calmer); it is flipped back here,
/// along with the sign of each factor's impact.
pub(crate) fn format_prediction(
    metric: WellbeingMetric,
    prediction: &PredictionResult,
) -> Vec<String> {
    let sign = if metric.is_inverted() { -1.0 } else { 1.0 };

    let mut lines = vec![format!(
        "   {:18} {:>6.2}  ({} confidence)",
        metric.as_str(),
        metric.from_oriented(prediction.predicted_value),
        prediction.confidence
    )];
    for factor in &prediction.factors {
        lines.push(format!(
            "      {:20} {:+.3} ({}%)",
            factor.metric.as_str(),
            sign * factor.impact,
            factor.contribution_percent
        ));
    }
    lines
}

//! Integration tests for wellspend-core
//!
//! These tests exercise the full import → aggregate → correlate → train →
//! simulate workflow.

use std::collections::BTreeMap;

use wellspend_core::{
    aggregate_weekly,
    analyze_correlations,
    import::{parse_scenarios_json, parse_transactions_csv, parse_wellbeing_csv},
    models::mean_snapshot,
    predict, run_analysis, simulate_scenarios, top_correlations, train_model, AnalysisConfig,
    AnalysisInput, FinancialMetric, FinancialSnapshot, RecommendationBasis, ScenarioSpec,
    WellbeingMetric,
};

/// Six weeks (Sunday 2024-01-07 onward) where takeout food rises and
/// wellbeing falls, with noise in the other categories
fn transactions_csv() -> &'static str {
    "date,category,amount
2024-01-07,Food,60
2024-01-09,Shopping,45
2024-01-11,Rent,400
2024-01-14,Food,95
2024-01-16,Shopping,20
2024-01-18,Transport,30
2024-01-21,Food,130
2024-01-23,Shopping,60
2024-01-24,Entertainment,25
2024-01-28,Food,150
2024-01-30,Shopping,10
2024-02-01,Self-Care,40
2024-02-04,Food,185
2024-02-06,Shopping,35
2024-02-11,Food,230
2024-02-13,Shopping,50
2024-02-14,Transport,15
"
}

fn wellbeing_csv() -> &'static str {
    "date,overall_wellbeing,stress_level,sleep_quality,energy_level,mood
2024-01-10,8.5,3,7,7,8
2024-01-17,7.5,4,6,6,8
2024-01-24,7,4,7,7,7
2024-01-31,6,6,5,5,6
2024-02-07,5,7,6,6,5
2024-02-14,4,8,4,5,4
2024-02-28,9,1,9,9,9
"
}

fn load() -> (
    Vec<wellspend_core::Transaction>,
    Vec<wellspend_core::WellbeingEntry>,
) {
    let txs = parse_transactions_csv(transactions_csv().as_bytes()).expect("transactions");
    let entries = parse_wellbeing_csv(wellbeing_csv().as_bytes()).expect("wellbeing");
    (txs, entries)
}

#[test]
fn test_import_and_aggregate() {
    let (txs, entries) = load();
    assert_eq!(txs.len(), 17);
    assert_eq!(entries.len(), 7);

    let weeks = aggregate_weekly(&txs, &entries);

    // The late-February check-in has no spending week and is dropped
    assert_eq!(weeks.len(), 6);
    assert_eq!(weeks[0].week.as_str(), "2024-W02");
    assert_eq!(weeks[0].financial.total_spending, 505.0);
    assert_eq!(weeks[0].financial.food_spending, 60.0);
    assert_eq!(weeks[0].wellbeing.overall_wellbeing, 8.5);
}

#[test]
fn test_food_drives_wellbeing_down() {
    let (txs, entries) = load();
    let weeks = aggregate_weekly(&txs, &entries);
    let correlations = analyze_correlations(&weeks);

    assert!(correlations.iter().all(|c| c.correlation.abs() > 0.1));
    for pair in correlations.windows(2) {
        assert!(pair[0].correlation.abs() >= pair[1].correlation.abs());
    }

    let food_overall = correlations
        .iter()
        .find(|c| {
            c.financial_metric == FinancialMetric::FoodSpending
                && c.wellbeing_metric == WellbeingMetric::OverallWellbeing
        })
        .expect("food/overall correlation");
    assert_eq!(food_overall.correlation, -1.0);
}

#[test]
fn test_train_predict_at_mean() {
    let (txs, entries) = load();
    let weeks = aggregate_weekly(&txs, &entries);
    let significant = top_correlations(&analyze_correlations(&weeks), 5);

    let model = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant)
        .expect("no singular matrix")
        .expect("enough data for a model");

    assert!(!model.feature_names.is_empty() && model.feature_names.len() <= 2);
    assert!(model.r_squared >= 0.0 && model.r_squared <= 1.0);

    // OLS with an intercept passes through the mean point
    let mean_target = weeks
        .iter()
        .map(|w| w.wellbeing.overall_wellbeing)
        .sum::<f64>()
        / weeks.len() as f64;
    let prediction = predict(&model, &mean_snapshot(&weeks));
    assert!((prediction.predicted_value - mean_target).abs() < 1e-6);
}

#[test]
fn test_zero_delta_scenario_matches_predict() {
    let (txs, entries) = load();
    let weeks = aggregate_weekly(&txs, &entries);
    let significant = top_correlations(&analyze_correlations(&weeks), 5);

    let mut models = BTreeMap::new();
    for metric in WellbeingMetric::ALL {
        if let Ok(Some(model)) = train_model(&weeks, metric, &significant) {
            models.insert(metric, model);
        }
    }
    assert!(!models.is_empty());

    let baseline = mean_snapshot(&weeks);
    let zero: FinancialSnapshot = FinancialMetric::ALL.into_iter().map(|m| (m, 0.0)).collect();
    let scenarios = simulate_scenarios(
        &models,
        &baseline,
        &[ScenarioSpec::new("Stay the course", zero)],
    );

    for (metric, model) in &models {
        assert_eq!(
            scenarios[0].predicted_impact[metric],
            predict(model, &baseline)
        );
    }
}

#[test]
fn test_insufficient_weeks_end_to_end() {
    let (txs, entries) = load();
    // Only the first two weeks of check-ins
    let weeks = aggregate_weekly(&txs, &entries[..2]);
    assert_eq!(weeks.len(), 2);
    assert!(analyze_correlations(&weeks).is_empty());
}

#[test]
fn test_run_analysis_with_scenarios() {
    let (transactions, wellbeing) = load();
    let scenarios = parse_scenarios_json(
        r#"[
            {"name": "Cook at home", "deltas": {"foodSpending": -80}},
            {"name": "Order in more", "deltas": {"foodSpending": 80}}
        ]"#
        .as_bytes(),
    )
    .unwrap();
    let input = AnalysisInput {
        transactions,
        wellbeing,
        scenarios,
    };

    let mut config = AnalysisConfig::default();
    config.scenario.basis = RecommendationBasis::BaselineDelta;
    let report = run_analysis(&input, &config).unwrap();

    assert_eq!(report.weeks.len(), 6);
    assert_eq!(report.scenarios.len(), 2);

    let cook = &report.scenarios[0];
    let order = &report.scenarios[1];
    let overall = WellbeingMetric::OverallWellbeing;
    assert!(
        cook.predicted_impact[&overall].predicted_value
            > order.predicted_impact[&overall].predicted_value
    );
    assert!(cook.recommendation.contains("overallWellbeing"));
}

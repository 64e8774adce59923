//! Linear regression of wellbeing on significant spending metrics
//!
//! Models are fit by ordinary least squares through the normal equation
//! `β = (XᵀX)⁻¹ Xᵀy`. Weekly samples are small, so at most
//! [`MAX_FEATURES`] financial metrics enter a model.
//!
//! Features are scaled identically at train and predict time: savings rate
//! is divided by 100 and currency amounts by 1000. Stress targets are flipped
//! (`11 - value`) so that higher predictions always mean "better".

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::correlation::CorrelationResult;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::models::{
    snapshot_value, FinancialMetric, FinancialSnapshot, WeeklyAggregate, WellbeingMetric,
};
use crate::stats::{mean, round_to};

/// Upper bound on features per model
pub const MAX_FEATURES: usize = 2;

/// A fitted linear model for one wellbeing metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub target_metric: WellbeingMetric,
    pub feature_names: Vec<FinancialMetric>,
    /// One coefficient per feature, in scaled units
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Coefficient of determination, rounded to 3 decimals
    pub r_squared: f64,
    /// `1 - R²`. A heuristic for ranking fits, NOT a statistical p-value.
    pub p_value_approx: f64,
    /// Number of weeks the model was fit on
    pub training_weeks: usize,
}

impl RegressionModel {
    pub fn confidence(&self) -> Confidence {
        Confidence::from_r_squared(self.r_squared)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.7 {
            Self::High
        } else if r_squared > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much one feature moved a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactor {
    pub metric: FinancialMetric,
    /// `coefficient * scaled value`
    pub impact: f64,
    /// Share of total absolute impact, 0-100
    pub contribution_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_value: f64,
    pub confidence: Confidence,
    /// Sorted by absolute impact, largest first
    pub factors: Vec<PredictionFactor>,
}

/// Why a wellbeing metric ended up without a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No significant correlation mentions this metric
    NoSignificantFeatures,
    /// Fewer weeks than features + 1
    InsufficientData { weeks: usize, required: usize },
    /// XᵀX could not be inverted for this feature combination
    SingularMatrix { features: Vec<FinancialMetric> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSignificantFeatures => write!(f, "no significant spending correlations"),
            Self::InsufficientData { weeks, required } => {
                write!(f, "insufficient data ({} weeks, need {})", weeks, required)
            }
            Self::SingularMatrix { features } => {
                let names: Vec<&str> = features.iter().map(|m| m.as_str()).collect();
                write!(f, "singular matrix for features [{}]", names.join(", "))
            }
        }
    }
}

/// Models for every wellbeing metric that could be trained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainedModels {
    pub models: BTreeMap<WellbeingMetric, RegressionModel>,
    pub skipped: BTreeMap<WellbeingMetric, SkipReason>,
}

enum TrainOutcome {
    Trained(RegressionModel),
    Skipped(SkipReason),
}

/// Financial metrics paired with `target` among the significant correlations,
/// in the given order, capped at [`MAX_FEATURES`]
pub fn select_features(
    target: WellbeingMetric,
    significant: &[CorrelationResult],
) -> Vec<FinancialMetric> {
    let mut features = Vec::new();
    for result in significant.iter().filter(|r| r.wellbeing_metric == target) {
        if !features.contains(&result.financial_metric) {
            features.push(result.financial_metric);
        }
        if features.len() == MAX_FEATURES {
            break;
        }
    }
    features
}

/// Fit a model for `target`.
///
/// Returns `Ok(None)` when no significant feature involves the target or
/// there are fewer weeks than features + 1. A singular normal matrix is an
/// `Err`, since silently using a bad inverse would corrupt the coefficients.
pub fn train_model(
    weeks: &[WeeklyAggregate],
    target: WellbeingMetric,
    significant: &[CorrelationResult],
) -> Result<Option<RegressionModel>> {
    match fit(weeks, target, significant)? {
        TrainOutcome::Trained(model) => Ok(Some(model)),
        TrainOutcome::Skipped(_) => Ok(None),
    }
}

/// Train every wellbeing metric, recording why any were skipped.
///
/// Singular matrices are caught here and recorded per target.
pub fn train_models(
    weeks: &[WeeklyAggregate],
    significant: &[CorrelationResult],
) -> Result<TrainedModels> {
    let mut trained = TrainedModels::default();

    for target in WellbeingMetric::ALL {
        match fit(weeks, target, significant) {
            Ok(TrainOutcome::Trained(model)) => {
                trained.models.insert(target, model);
            }
            Ok(TrainOutcome::Skipped(reason)) => {
                trained.skipped.insert(target, reason);
            }
            Err(e) if e.is_singular() => {
                trained.skipped.insert(
                    target,
                    SkipReason::SingularMatrix {
                        features: select_features(target, significant),
                    },
                );
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        trained = trained.models.len(),
        skipped = trained.skipped.len(),
        "Model training complete"
    );

    Ok(trained)
}

fn fit(
    weeks: &[WeeklyAggregate],
    target: WellbeingMetric,
    significant: &[CorrelationResult],
) -> Result<TrainOutcome> {
    let features = select_features(target, significant);

    if features.is_empty() {
        debug!(metric = %target, "No significant features, skipping model");
        return Ok(TrainOutcome::Skipped(SkipReason::NoSignificantFeatures));
    }

    let required = features.len() + 1;
    if weeks.len() < required {
        debug!(
            metric = %target,
            weeks = weeks.len(),
            required,
            "Insufficient data for regression"
        );
        return Ok(TrainOutcome::Skipped(SkipReason::InsufficientData {
            weeks: weeks.len(),
            required,
        }));
    }

    let rows: Vec<Vec<f64>> = weeks
        .iter()
        .map(|w| {
            std::iter::once(1.0)
                .chain(features.iter().map(|f| f.scale(w.financial(*f))))
                .collect()
        })
        .collect();
    let y: Vec<f64> = weeks
        .iter()
        .map(|w| target.oriented(w.wellbeing(target)))
        .collect();

    let x = Matrix::from_rows(rows)?;
    let xt = x.transpose();
    let xtx = xt.multiply(&x)?;
    let xty = xt.multiply_vector(&y)?;

    let inverse = xtx.inverse().inspect_err(|e| {
        if e.is_singular() {
            let names: Vec<&str> = features.iter().map(|f| f.as_str()).collect();
            warn!(
                metric = %target,
                features = %names.join(","),
                error = %e,
                "Singular matrix while fitting model"
            );
        }
    })?;
    let beta = inverse.multiply_vector(&xty)?;

    let fitted = x.multiply_vector(&beta)?;
    let y_mean = mean(&y);
    let ss_res: f64 = y.iter().zip(&fitted).map(|(a, b)| (a - b).powi(2)).sum();
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    let model = RegressionModel {
        target_metric: target,
        feature_names: features,
        coefficients: beta[1..].to_vec(),
        intercept: beta[0],
        r_squared: round_to(r_squared, 3),
        p_value_approx: round_to((1.0 - r_squared).max(0.0), 3),
        training_weeks: weeks.len(),
    };

    debug!(
        metric = %target,
        r_squared = model.r_squared,
        features = model.feature_names.len(),
        "Trained regression model"
    );

    Ok(TrainOutcome::Trained(model))
}

/// Predict the (oriented) target value for a raw financial snapshot.
///
/// Metrics missing from the snapshot count as 0. The model must carry one
/// coefficient per feature, as [`train_model`] produces.
pub fn predict(model: &RegressionModel, snapshot: &FinancialSnapshot) -> PredictionResult {
    debug_assert_eq!(
        model.feature_names.len(),
        model.coefficients.len(),
        "one coefficient per feature"
    );
    let mut predicted_value = model.intercept;
    let mut impacts = Vec::with_capacity(model.feature_names.len());

    for (metric, coefficient) in model.feature_names.iter().zip(&model.coefficients) {
        let impact = coefficient * metric.scale(snapshot_value(snapshot, *metric));
        predicted_value += impact;
        impacts.push((*metric, impact));
    }

    let total_impact: f64 = impacts.iter().map(|(_, i)| i.abs()).sum();
    let mut factors: Vec<PredictionFactor> = impacts
        .into_iter()
        .map(|(metric, impact)| PredictionFactor {
            metric,
            impact,
            contribution_percent: if total_impact == 0.0 {
                0
            } else {
                (100.0 * impact.abs() / total_impact).round() as u32
            },
        })
        .collect();
    factors.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));

    PredictionResult {
        predicted_value,
        confidence: model.confidence(),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::{CorrelationDirection, CorrelationStrength};
    use crate::models::{FinancialSummary, WellbeingSummary};
    use crate::week::WeekKey;
    use chrono::{Duration, NaiveDate};

    fn week(i: i64, food: f64, shopping: f64, overall: f64) -> WeeklyAggregate {
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + Duration::weeks(i);
        WeeklyAggregate {
            week: WeekKey::from_date(date),
            financial: FinancialSummary {
                total_spending: food + shopping,
                food_spending: food,
                shopping_spending: shopping,
                savings_rate: 16.667,
                ..Default::default()
            },
            wellbeing: WellbeingSummary {
                overall_wellbeing: overall,
                stress_level: 11.0 - overall,
                sleep_quality: 6.0,
                energy_level: 6.0,
                mood: 6.0,
            },
        }
    }

    fn corr(f: FinancialMetric, w: WellbeingMetric, r: f64) -> CorrelationResult {
        CorrelationResult {
            financial_metric: f,
            wellbeing_metric: w,
            correlation: r,
            strength: CorrelationStrength::classify(r),
            direction: if r > 0.0 {
                CorrelationDirection::Positive
            } else {
                CorrelationDirection::Negative
            },
            significance: 1.0 - r.abs(),
        }
    }

    #[test]
    fn test_select_features_caps_at_two() {
        let significant = vec![
            corr(FinancialMetric::FoodSpending, WellbeingMetric::Mood, 0.9),
            corr(FinancialMetric::TotalSpending, WellbeingMetric::OverallWellbeing, 0.8),
            corr(FinancialMetric::ShoppingSpending, WellbeingMetric::Mood, -0.7),
            corr(FinancialMetric::TransportSpending, WellbeingMetric::Mood, 0.6),
        ];
        assert_eq!(
            select_features(WellbeingMetric::Mood, &significant),
            vec![FinancialMetric::FoodSpending, FinancialMetric::ShoppingSpending]
        );
        assert!(select_features(WellbeingMetric::SleepQuality, &significant).is_empty());
    }

    #[test]
    fn test_exact_linear_fit() {
        // overall = 10 - 20 * (food / 1000)
        let weeks: Vec<_> = (0..4)
            .map(|i| {
                let food = 100.0 + 50.0 * i as f64;
                week(i, food, 30.0, 10.0 - 20.0 * food / 1000.0)
            })
            .collect();
        let significant = vec![corr(
            FinancialMetric::FoodSpending,
            WellbeingMetric::OverallWellbeing,
            -1.0,
        )];

        let model = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant)
            .unwrap()
            .unwrap();

        assert!((model.intercept - 10.0).abs() < 1e-9);
        assert!((model.coefficients[0] + 20.0).abs() < 1e-9);
        assert_eq!(model.r_squared, 1.0);
        assert_eq!(model.p_value_approx, 0.0);
        assert_eq!(model.training_weeks, 4);
    }

    #[test]
    fn test_single_feature_r_squared_in_range() {
        let weeks = vec![
            week(0, 100.0, 10.0, 8.0),
            week(1, 150.0, 20.0, 5.0),
            week(2, 200.0, 15.0, 6.0),
            week(3, 250.0, 40.0, 3.0),
        ];
        let significant = vec![corr(
            FinancialMetric::FoodSpending,
            WellbeingMetric::OverallWellbeing,
            -0.8,
        )];

        let model = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant)
            .unwrap()
            .expect("model");
        assert!(model.r_squared >= 0.0 && model.r_squared <= 1.0);
        assert_eq!(model.feature_names, vec![FinancialMetric::FoodSpending]);
    }

    #[test]
    fn test_too_few_weeks_is_no_model() {
        let weeks = vec![week(0, 100.0, 10.0, 8.0), week(1, 150.0, 20.0, 5.0)];
        let significant = vec![
            corr(FinancialMetric::FoodSpending, WellbeingMetric::OverallWellbeing, -0.8),
            corr(FinancialMetric::ShoppingSpending, WellbeingMetric::OverallWellbeing, -0.6),
        ];
        // Two features need three weeks
        let result = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_minimum_weeks_fits_exactly() {
        // One feature needs two weeks; two points always fit a line
        let weeks = vec![week(0, 100.0, 10.0, 8.0), week(1, 200.0, 20.0, 6.0)];
        let significant = vec![corr(
            FinancialMetric::FoodSpending,
            WellbeingMetric::OverallWellbeing,
            -1.0,
        )];

        let model = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant)
            .unwrap()
            .expect("two weeks are enough for one feature");

        assert_eq!(model.training_weeks, 2);
        assert!((model.coefficients[0] + 20.0).abs() < 1e-9);
        assert!((model.intercept - 10.0).abs() < 1e-9);
        assert_eq!(model.r_squared, 1.0);
    }

    #[test]
    fn test_no_features_is_no_model() {
        let weeks = vec![week(0, 100.0, 10.0, 8.0), week(1, 150.0, 20.0, 5.0)];
        let result = train_model(&weeks, WellbeingMetric::Mood, &[]);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_duplicate_features_are_singular() {
        // Shopping is always food / 2, so the columns are collinear
        let weeks: Vec<_> = (0..5)
            .map(|i| {
                let food = 100.0 + 40.0 * i as f64;
                week(i, food, food / 2.0, 8.0 - i as f64)
            })
            .collect();
        let significant = vec![
            corr(FinancialMetric::FoodSpending, WellbeingMetric::OverallWellbeing, -1.0),
            corr(FinancialMetric::ShoppingSpending, WellbeingMetric::OverallWellbeing, -1.0),
        ];

        let err = train_model(&weeks, WellbeingMetric::OverallWellbeing, &significant)
            .unwrap_err();
        assert!(err.is_singular());

        let trained = train_models(&weeks, &significant).unwrap();
        assert!(trained.models.is_empty());
        assert_eq!(
            trained.skipped.get(&WellbeingMetric::OverallWellbeing),
            Some(&SkipReason::SingularMatrix {
                features: vec![
                    FinancialMetric::FoodSpending,
                    FinancialMetric::ShoppingSpending
                ]
            })
        );
        assert_eq!(
            trained.skipped.get(&WellbeingMetric::Mood),
            Some(&SkipReason::NoSignificantFeatures)
        );
    }

    #[test]
    fn test_stress_target_is_inverted() {
        // stress = 11 - overall, so inverted stress equals overall exactly
        let weeks = vec![
            week(0, 100.0, 10.0, 8.0),
            week(1, 150.0, 20.0, 5.0),
            week(2, 200.0, 15.0, 6.0),
            week(3, 250.0, 40.0, 3.0),
        ];
        let overall_sig = vec![corr(
            FinancialMetric::FoodSpending,
            WellbeingMetric::OverallWellbeing,
            -0.8,
        )];
        let stress_sig = vec![corr(
            FinancialMetric::FoodSpending,
            WellbeingMetric::StressLevel,
            -0.8,
        )];

        let overall = train_model(&weeks, WellbeingMetric::OverallWellbeing, &overall_sig)
            .unwrap()
            .unwrap();
        let stress = train_model(&weeks, WellbeingMetric::StressLevel, &stress_sig)
            .unwrap()
            .unwrap();

        assert!((overall.intercept - stress.intercept).abs() < 1e-9);
        assert!((overall.coefficients[0] - stress.coefficients[0]).abs() < 1e-9);
    }

    fn model(features: Vec<FinancialMetric>, coefficients: Vec<f64>, r2: f64) -> RegressionModel {
        RegressionModel {
            target_metric: WellbeingMetric::Mood,
            feature_names: features,
            coefficients,
            intercept: 5.0,
            r_squared: r2,
            p_value_approx: 1.0 - r2,
            training_weeks: 10,
        }
    }

    #[test]
    fn test_predict_attribution() {
        let m = model(
            vec![FinancialMetric::FoodSpending, FinancialMetric::SavingsRate],
            vec![2.0, -1.0],
            0.8,
        );
        let snapshot: FinancialSnapshot = [
            (FinancialMetric::FoodSpending, 500.0),
            (FinancialMetric::SavingsRate, 300.0),
        ]
        .into_iter()
        .collect();

        let prediction = predict(&m, &snapshot);
        // 5 + 2 * 0.5 - 1 * 3.0
        assert!((prediction.predicted_value - 3.0).abs() < 1e-12);
        assert_eq!(prediction.confidence, Confidence::High);
        assert_eq!(prediction.factors[0].metric, FinancialMetric::SavingsRate);
        assert_eq!(prediction.factors[0].contribution_percent, 75);
        assert_eq!(prediction.factors[1].contribution_percent, 25);
    }

    #[test]
    fn test_predict_missing_metrics_default_to_zero() {
        let m = model(vec![FinancialMetric::FoodSpending], vec![3.0], 0.5);
        let prediction = predict(&m, &FinancialSnapshot::new());

        assert_eq!(prediction.predicted_value, 5.0);
        assert_eq!(prediction.confidence, Confidence::Medium);
        assert_eq!(prediction.factors[0].contribution_percent, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one coefficient per feature")]
    fn test_predict_rejects_mismatched_model() {
        let m = model(
            vec![FinancialMetric::FoodSpending, FinancialMetric::ShoppingSpending],
            vec![3.0],
            0.5,
        );
        predict(&m, &FinancialSnapshot::new());
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(Confidence::from_r_squared(0.71), Confidence::High);
        assert_eq!(Confidence::from_r_squared(0.7), Confidence::Medium);
        assert_eq!(Confidence::from_r_squared(0.41), Confidence::Medium);
        assert_eq!(Confidence::from_r_squared(0.4), Confidence::Low);
    }
}

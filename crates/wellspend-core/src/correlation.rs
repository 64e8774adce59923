//! Correlation discovery between spending and wellbeing
//!
//! Every financial metric is paired with every wellbeing metric and scored
//! with a Spearman rank correlation over the weekly aggregates. Stress is
//! flipped first so a positive correlation always means "better".

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::CorrelationConfig;
use crate::models::{FinancialMetric, WeeklyAggregate, WellbeingMetric};
use crate::stats::{round_to, spearman};

/// Fewer weekly observations than this yields no correlations
pub const MIN_WEEKS_FOR_CORRELATION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    pub fn classify(correlation: f64) -> Self {
        let magnitude = correlation.abs();
        if magnitude > 0.7 {
            Self::Strong
        } else if magnitude > 0.4 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

impl CorrelationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Correlation between one financial and one wellbeing metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub financial_metric: FinancialMetric,
    pub wellbeing_metric: WellbeingMetric,
    /// Spearman correlation, rounded to 3 decimals
    pub correlation: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    /// `1 - |correlation|`; a monotonic heuristic, not a p-value
    pub significance: f64,
}

impl CorrelationResult {
    fn from_correlation(
        financial_metric: FinancialMetric,
        wellbeing_metric: WellbeingMetric,
        correlation: f64,
    ) -> Self {
        let direction = if correlation > 0.0 {
            CorrelationDirection::Positive
        } else {
            CorrelationDirection::Negative
        };
        Self {
            financial_metric,
            wellbeing_metric,
            correlation: round_to(correlation, 3),
            strength: CorrelationStrength::classify(correlation),
            direction,
            significance: round_to((1.0 - correlation.abs()).max(0.0), 3),
        }
    }

    /// Moderate or strong
    pub fn is_significant(&self) -> bool {
        matches!(
            self.strength,
            CorrelationStrength::Moderate | CorrelationStrength::Strong
        )
    }
}

/// Correlate with default thresholds
pub fn analyze_correlations(weeks: &[WeeklyAggregate]) -> Vec<CorrelationResult> {
    analyze_correlations_with(weeks, &CorrelationConfig::default())
}

/// Score every (financial, wellbeing) pair, strongest first.
///
/// With fewer than [`MIN_WEEKS_FOR_CORRELATION`] weeks this logs an
/// insufficient-data warning and returns nothing.
pub fn analyze_correlations_with(
    weeks: &[WeeklyAggregate],
    config: &CorrelationConfig,
) -> Vec<CorrelationResult> {
    if weeks.len() < MIN_WEEKS_FOR_CORRELATION {
        warn!(
            weeks = weeks.len(),
            required = MIN_WEEKS_FOR_CORRELATION,
            "Insufficient data for correlation analysis"
        );
        return Vec::new();
    }

    let mut results = Vec::new();

    for financial in FinancialMetric::ALL {
        let x: Vec<f64> = weeks.iter().map(|w| w.financial(financial)).collect();

        for wellbeing in WellbeingMetric::ALL {
            let y: Vec<f64> = weeks
                .iter()
                .map(|w| wellbeing.oriented(w.wellbeing(wellbeing)))
                .collect();

            let correlation = spearman(&x, &y);
            if correlation.abs() <= config.min_abs_correlation {
                continue;
            }

            results.push(CorrelationResult::from_correlation(
                financial,
                wellbeing,
                correlation,
            ));
        }
    }

    // Stable sort keeps metric order among equal magnitudes
    results.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));

    debug!(
        weeks = weeks.len(),
        correlations = results.len(),
        "Correlation analysis complete"
    );

    results
}

/// The first `limit` moderate/strong correlations, in engine order
pub fn top_correlations(results: &[CorrelationResult], limit: usize) -> Vec<CorrelationResult> {
    results
        .iter()
        .filter(|r| r.is_significant())
        .take(limit)
        .cloned()
        .collect()
}

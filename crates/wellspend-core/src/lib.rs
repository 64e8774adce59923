//! Wellspend Core Library
//!
//! Correlates self-reported wellbeing with categorized spending:
//! - Weekly aggregation of transactions and check-ins
//! - Spearman correlation discovery across spending/wellbeing pairs
//! - Linear regression models over the significant spending metrics
//! - Point predictions with per-feature attribution
//! - What-if simulation of spending changes
//!
//! Everything here is synchronous, in-memory computation. Storage, account
//! APIs and natural-language narration belong to the caller.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod correlation;
pub mod error;
pub mod import;
pub mod matrix;
pub mod models;
pub mod regression;
pub mod scenario;
pub mod stats;
pub mod week;

/// Sample data builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate_weekly, aggregate_weekly_with};
pub use analysis::{run_analysis, AnalysisInput, AnalysisReport};
pub use config::{
    AggregationConfig, AnalysisConfig, CorrelationConfig, RecommendationBasis, ScenarioConfig,
};
pub use correlation::{
    analyze_correlations, analyze_correlations_with, top_correlations, CorrelationDirection,
    CorrelationResult, CorrelationStrength,
};
pub use error::{Error, Result};
pub use models::{
    FinancialMetric, FinancialSnapshot, FinancialSummary, TrackedCategory, Transaction,
    WeeklyAggregate, WellbeingEntry, WellbeingMetric, WellbeingSummary,
};
pub use regression::{
    predict, train_model, train_models, Confidence, PredictionFactor, PredictionResult,
    RegressionModel, SkipReason, TrainedModels,
};
pub use scenario::{simulate_scenarios, simulate_scenarios_with, ScenarioSpec, WhatIfScenario};
pub use week::WeekKey;

//! Analysis configuration
//!
//! Tunable thresholds for aggregation, correlation filtering, and scenario
//! recommendations.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/wellspend/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Weekly aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Estimated income = weekly spending * this multiplier
    pub income_multiplier: f64,
    /// Preceding weeks averaged for the anomaly baseline (0 disables detection)
    pub anomaly_window_weeks: usize,
    /// Spending above baseline * multiplier counts as anomalous
    pub anomaly_multiplier: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            income_multiplier: 1.2,
            anomaly_window_weeks: 4,
            anomaly_multiplier: 1.5,
        }
    }
}

/// Correlation filtering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Correlations with |r| at or below this are discarded
    pub min_abs_correlation: f64,
    /// How many moderate/strong correlations feed regression training
    pub top_limit: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_abs_correlation: 0.1,
            top_limit: 5,
        }
    }
}

/// What the scenario recommendation classifies as an "impact"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBasis {
    /// The scenario's predicted value itself
    #[default]
    Absolute,
    /// Scenario prediction minus the prediction for the unmodified baseline
    BaselineDelta,
}

impl RecommendationBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::BaselineDelta => "baseline_delta",
        }
    }
}

impl std::str::FromStr for RecommendationBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "baseline_delta" | "baseline-delta" | "delta" => Ok(Self::BaselineDelta),
            _ => Err(format!(
                "Unknown recommendation basis: {} (valid: absolute, baseline_delta)",
                s
            )),
        }
    }
}

/// Scenario simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Values beyond +/- this threshold count as positive/negative impacts
    pub impact_threshold: f64,
    pub basis: RecommendationBasis,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            impact_threshold: 0.5,
            basis: RecommendationBasis::Absolute,
        }
    }
}

/// Full analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub aggregation: AggregationConfig,
    pub correlation: CorrelationConfig,
    pub scenario: ScenarioConfig,
}

impl AnalysisConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit override path (embedded defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content, applying it on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("wellspend").join("config").join("analysis.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading analysis config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    aggregation: Option<RawAggregation>,
    correlation: Option<RawCorrelation>,
    scenario: Option<RawScenario>,
}

#[derive(Debug, Deserialize)]
struct RawAggregation {
    income_multiplier: Option<f64>,
    anomaly_window_weeks: Option<usize>,
    anomaly_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCorrelation {
    min_abs_correlation: Option<f64>,
    top_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    impact_threshold: Option<f64>,
    basis: Option<String>,
}

fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(agg) = raw.aggregation {
        if let Some(multiplier) = agg.income_multiplier {
            if multiplier <= 0.0 {
                return Err(Error::Config(
                    "aggregation.income_multiplier must be positive".into(),
                ));
            }
            config.aggregation.income_multiplier = multiplier;
        }
        if let Some(window) = agg.anomaly_window_weeks {
            config.aggregation.anomaly_window_weeks = window;
        }
        if let Some(multiplier) = agg.anomaly_multiplier {
            config.aggregation.anomaly_multiplier = multiplier;
        }
    }

    if let Some(corr) = raw.correlation {
        if let Some(min) = corr.min_abs_correlation {
            if !(0.0..1.0).contains(&min) {
                return Err(Error::Config(
                    "correlation.min_abs_correlation must be in [0, 1)".into(),
                ));
            }
            config.correlation.min_abs_correlation = min;
        }
        if let Some(limit) = corr.top_limit {
            config.correlation.top_limit = limit;
        }
    }

    if let Some(scenario) = raw.scenario {
        if let Some(threshold) = scenario.impact_threshold {
            config.scenario.impact_threshold = threshold;
        }
        if let Some(basis) = scenario.basis {
            config.scenario.basis = basis.parse().map_err(Error::Config)?;
        }
    }

    Ok(config)
}

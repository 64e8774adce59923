//! Domain models for Wellspend

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::week::WeekKey;

/// A single spending record, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Free-form category label; only exact tracked labels are broken out
    pub category: String,
    /// Amount spent (non-negative)
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
        }
    }
}

/// A self-reported wellbeing check-in. Every field is nominally on a 1-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellbeingEntry {
    pub date: NaiveDate,
    pub overall_wellbeing: f64,
    pub stress_level: f64,
    pub sleep_quality: f64,
    pub energy_level: f64,
    pub mood: f64,
}

impl WellbeingEntry {
    pub fn summary(&self) -> WellbeingSummary {
        WellbeingSummary {
            overall_wellbeing: self.overall_wellbeing,
            stress_level: self.stress_level,
            sleep_quality: self.sleep_quality,
            energy_level: self.energy_level,
            mood: self.mood,
        }
    }
}

/// Spending categories that get their own weekly total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedCategory {
    Entertainment,
    Food,
    Shopping,
    Transport,
    #[serde(rename = "Self-Care")]
    SelfCare,
}

impl TrackedCategory {
    pub const ALL: [TrackedCategory; 5] = [
        Self::Entertainment,
        Self::Food,
        Self::Shopping,
        Self::Transport,
        Self::SelfCare,
    ];

    /// The exact category label transactions must carry to match
    pub fn label(&self) -> &'static str {
        match self {
            Self::Entertainment => "Entertainment",
            Self::Food => "Food",
            Self::Shopping => "Shopping",
            Self::Transport => "Transport",
            Self::SelfCare => "Self-Care",
        }
    }

    /// Case-sensitive exact match against the tracked labels
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn metric(&self) -> FinancialMetric {
        match self {
            Self::Entertainment => FinancialMetric::EntertainmentSpending,
            Self::Food => FinancialMetric::FoodSpending,
            Self::Shopping => FinancialMetric::ShoppingSpending,
            Self::Transport => FinancialMetric::TransportSpending,
            Self::SelfCare => FinancialMetric::SelfCareSpending,
        }
    }
}

impl std::fmt::Display for TrackedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Financial metrics available as correlation inputs and regression features
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinancialMetric {
    TotalSpending,
    EntertainmentSpending,
    FoodSpending,
    ShoppingSpending,
    TransportSpending,
    SelfCareSpending,
    SavingsRate,
    AnomalySpending,
}

impl FinancialMetric {
    pub const ALL: [FinancialMetric; 8] = [
        Self::TotalSpending,
        Self::EntertainmentSpending,
        Self::FoodSpending,
        Self::ShoppingSpending,
        Self::TransportSpending,
        Self::SelfCareSpending,
        Self::SavingsRate,
        Self::AnomalySpending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSpending => "totalSpending",
            Self::EntertainmentSpending => "entertainmentSpending",
            Self::FoodSpending => "foodSpending",
            Self::ShoppingSpending => "shoppingSpending",
            Self::TransportSpending => "transportSpending",
            Self::SelfCareSpending => "selfCareSpending",
            Self::SavingsRate => "savingsRate",
            Self::AnomalySpending => "anomalySpending",
        }
    }

    /// Divisor bringing raw values into a comparable range for regression.
    /// Savings rate is a percentage; everything else is a currency amount.
    pub fn scale_divisor(&self) -> f64 {
        match self {
            Self::SavingsRate => 100.0,
            _ => 1000.0,
        }
    }

    pub fn scale(&self, raw: f64) -> f64 {
        raw / self.scale_divisor()
    }
}

impl std::str::FromStr for FinancialMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().to_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown financial metric: {}", s))
    }
}

impl std::fmt::Display for FinancialMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Self-reported wellbeing dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WellbeingMetric {
    OverallWellbeing,
    StressLevel,
    SleepQuality,
    EnergyLevel,
    Mood,
}

impl WellbeingMetric {
    pub const ALL: [WellbeingMetric; 5] = [
        Self::OverallWellbeing,
        Self::StressLevel,
        Self::SleepQuality,
        Self::EnergyLevel,
        Self::Mood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverallWellbeing => "overallWellbeing",
            Self::StressLevel => "stressLevel",
            Self::SleepQuality => "sleepQuality",
            Self::EnergyLevel => "energyLevel",
            Self::Mood => "mood",
        }
    }

    /// Map a raw rating so that larger is always better.
    ///
    /// Stress is the only dimension where a high rating is bad, so it is
    /// flipped on the 1-10 scale (`11 - value`).
    pub fn oriented(&self, raw: f64) -> f64 {
        match self {
            Self::StressLevel => 11.0 - raw,
            _ => raw,
        }
    }

    /// Whether [`oriented`](Self::oriented) flips this metric's scale
    pub fn is_inverted(&self) -> bool {
        matches!(self, Self::StressLevel)
    }

    /// Map an oriented value (e.g. a prediction) back to the rating scale
    pub fn from_oriented(&self, oriented: f64) -> f64 {
        // The flip is its own inverse
        self.oriented(oriented)
    }
}

impl std::str::FromStr for WellbeingMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().to_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown wellbeing metric: {}", s))
    }
}

impl std::fmt::Display for WellbeingMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw (unscaled) financial metric values. Absent metrics read as 0.
pub type FinancialSnapshot = BTreeMap<FinancialMetric, f64>;

/// Read a metric from a snapshot, defaulting to 0
pub fn snapshot_value(snapshot: &FinancialSnapshot, metric: FinancialMetric) -> f64 {
    snapshot.get(&metric).copied().unwrap_or(0.0)
}

/// Spending totals for one week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_spending: f64,
    pub entertainment_spending: f64,
    pub food_spending: f64,
    pub shopping_spending: f64,
    pub transport_spending: f64,
    pub self_care_spending: f64,
    pub savings_rate: f64,
    pub anomaly_spending: f64,
}

impl FinancialSummary {
    pub fn get(&self, metric: FinancialMetric) -> f64 {
        match metric {
            FinancialMetric::TotalSpending => self.total_spending,
            FinancialMetric::EntertainmentSpending => self.entertainment_spending,
            FinancialMetric::FoodSpending => self.food_spending,
            FinancialMetric::ShoppingSpending => self.shopping_spending,
            FinancialMetric::TransportSpending => self.transport_spending,
            FinancialMetric::SelfCareSpending => self.self_care_spending,
            FinancialMetric::SavingsRate => self.savings_rate,
            FinancialMetric::AnomalySpending => self.anomaly_spending,
        }
    }

    pub(crate) fn category_total_mut(&mut self, category: TrackedCategory) -> &mut f64 {
        match category {
            TrackedCategory::Entertainment => &mut self.entertainment_spending,
            TrackedCategory::Food => &mut self.food_spending,
            TrackedCategory::Shopping => &mut self.shopping_spending,
            TrackedCategory::Transport => &mut self.transport_spending,
            TrackedCategory::SelfCare => &mut self.self_care_spending,
        }
    }

    /// All eight metrics as a snapshot
    pub fn snapshot(&self) -> FinancialSnapshot {
        FinancialMetric::ALL
            .into_iter()
            .map(|m| (m, self.get(m)))
            .collect()
    }
}

/// Wellbeing ratings for one week (the last check-in of the week)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellbeingSummary {
    pub overall_wellbeing: f64,
    pub stress_level: f64,
    pub sleep_quality: f64,
    pub energy_level: f64,
    pub mood: f64,
}

impl WellbeingSummary {
    /// Raw rating as reported (stress is not flipped here)
    pub fn get(&self, metric: WellbeingMetric) -> f64 {
        match metric {
            WellbeingMetric::OverallWellbeing => self.overall_wellbeing,
            WellbeingMetric::StressLevel => self.stress_level,
            WellbeingMetric::SleepQuality => self.sleep_quality,
            WellbeingMetric::EnergyLevel => self.energy_level,
            WellbeingMetric::Mood => self.mood,
        }
    }
}

/// One joined observation: a week's spending alongside its wellbeing check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    pub week: WeekKey,
    pub financial: FinancialSummary,
    pub wellbeing: WellbeingSummary,
}

impl WeeklyAggregate {
    pub fn financial(&self, metric: FinancialMetric) -> f64 {
        self.financial.get(metric)
    }

    pub fn wellbeing(&self, metric: WellbeingMetric) -> f64 {
        self.wellbeing.get(metric)
    }
}

/// Mean of each financial metric across weeks. Empty input gives an empty snapshot.
pub fn mean_snapshot(weeks: &[WeeklyAggregate]) -> FinancialSnapshot {
    if weeks.is_empty() {
        return FinancialSnapshot::new();
    }
    let n = weeks.len() as f64;
    FinancialMetric::ALL
        .into_iter()
        .map(|m| (m, weeks.iter().map(|w| w.financial(m)).sum::<f64>() / n))
        .collect()
}

//! Weekly aggregation of transactions and wellbeing check-ins
//!
//! Transactions define which weeks exist. A check-in only attaches to a week
//! that already has spending, and a week is only kept once it has both.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::AggregationConfig;
use crate::models::{
    FinancialSummary, TrackedCategory, Transaction, WeeklyAggregate, WellbeingEntry,
    WellbeingSummary,
};
use crate::week::WeekKey;

/// Aggregate with default settings
pub fn aggregate_weekly(
    transactions: &[Transaction],
    wellbeing_entries: &[WellbeingEntry],
) -> Vec<WeeklyAggregate> {
    aggregate_weekly_with(transactions, wellbeing_entries, &AggregationConfig::default())
}

/// Group records into per-week aggregates, ordered by week key
pub fn aggregate_weekly_with(
    transactions: &[Transaction],
    wellbeing_entries: &[WellbeingEntry],
    config: &AggregationConfig,
) -> Vec<WeeklyAggregate> {
    let mut weeks: BTreeMap<WeekKey, WeeklyAggregate> = BTreeMap::new();

    for tx in transactions {
        let key = WeekKey::from_date(tx.date);
        let week = weeks
            .entry(key.clone())
            .or_insert_with(|| WeeklyAggregate {
                week: key,
                financial: FinancialSummary::default(),
                wellbeing: WellbeingSummary::default(),
            });

        week.financial.total_spending += tx.amount;
        if let Some(category) = TrackedCategory::from_label(&tx.category) {
            *week.financial.category_total_mut(category) += tx.amount;
        }
    }

    // Last check-in processed for a week wins
    let mut unmatched_entries = 0;
    for entry in wellbeing_entries {
        match weeks.get_mut(&WeekKey::from_date(entry.date)) {
            Some(week) => week.wellbeing = entry.summary(),
            None => unmatched_entries += 1,
        }
    }

    let totals: Vec<f64> = weeks.values().map(|w| w.financial.total_spending).collect();
    for (i, week) in weeks.values_mut().enumerate() {
        let total = week.financial.total_spending;
        week.financial.savings_rate = savings_rate(total, config.income_multiplier);
        week.financial.anomaly_spending = anomaly_spending(&totals[..i], total, config);
    }

    let financial_weeks = weeks.len();
    let aggregates: Vec<WeeklyAggregate> = weeks
        .into_values()
        .filter(|w| w.wellbeing.overall_wellbeing > 0.0 && w.financial.total_spending > 0.0)
        .collect();

    debug!(
        transactions = transactions.len(),
        financial_weeks,
        unmatched_entries,
        retained = aggregates.len(),
        "Weekly aggregation complete"
    );

    aggregates
}

/// Savings rate against an income estimated from spending.
///
/// Without a real income figure this is the same for every week
/// (`1 - 1/multiplier`, ≈16.67% at the default 1.2).
fn savings_rate(total_spending: f64, income_multiplier: f64) -> f64 {
    let estimated_income = total_spending * income_multiplier;
    if estimated_income <= 0.0 {
        return 0.0;
    }
    (estimated_income - total_spending) / estimated_income * 100.0
}

/// Spending above `multiplier` times the mean of the preceding weeks.
///
/// `history` holds the totals of all earlier weeks in chronological order;
/// only the trailing `anomaly_window_weeks` are used.
fn anomaly_spending(history: &[f64], total_spending: f64, config: &AggregationConfig) -> f64 {
    if config.anomaly_window_weeks == 0 || history.is_empty() {
        return 0.0;
    }

    let window = &history[history.len().saturating_sub(config.anomaly_window_weeks)..];
    let baseline = window.iter().sum::<f64>() / window.len() as f64;
    let threshold = baseline * config.anomaly_multiplier;

    if total_spending > threshold {
        total_spending - threshold
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn sunday(week: i64) -> NaiveDate {
        // 2024-01-07 is the first Sunday of 2024 (week 2)
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + Duration::weeks(week)
    }

    fn entry(date: NaiveDate, overall: f64) -> WellbeingEntry {
        WellbeingEntry {
            date,
            overall_wellbeing: overall,
            stress_level: 5.0,
            sleep_quality: 6.0,
            energy_level: 7.0,
            mood: 6.0,
        }
    }

    #[test]
    fn test_category_totals() {
        let day = sunday(0);
        let txs = vec![
            Transaction::new(day, "Food", 40.0),
            Transaction::new(day, "Food", 10.0),
            Transaction::new(day, "Self-Care", 25.0),
            Transaction::new(day, "food", 5.0),
            Transaction::new(day, "Rent", 100.0),
        ];
        let weeks = aggregate_weekly(&txs, &[entry(day, 7.0)]);

        assert_eq!(weeks.len(), 1);
        let fin = &weeks[0].financial;
        assert_eq!(fin.total_spending, 180.0);
        assert_eq!(fin.food_spending, 50.0);
        assert_eq!(fin.self_care_spending, 25.0);
        assert_eq!(fin.shopping_spending, 0.0);
    }

    #[test]
    fn test_last_checkin_wins() {
        let day = sunday(0);
        let txs = vec![Transaction::new(day, "Food", 40.0)];
        let entries = vec![entry(day, 3.0), entry(day + Duration::days(2), 9.0)];

        let weeks = aggregate_weekly(&txs, &entries);
        assert_eq!(weeks[0].wellbeing.overall_wellbeing, 9.0);
    }

    #[test]
    fn test_unmatched_weeks_dropped() {
        let txs = vec![
            Transaction::new(sunday(0), "Food", 40.0),
            Transaction::new(sunday(1), "Food", 60.0),
        ];
        // Check-in for week 0 only, plus one for a week with no spending
        let entries = vec![entry(sunday(0), 6.0), entry(sunday(5), 8.0)];

        let weeks = aggregate_weekly(&txs, &entries);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week, WeekKey::from_date(sunday(0)));
    }

    #[test]
    fn test_zero_spending_week_dropped() {
        let txs = vec![Transaction::new(sunday(0), "Food", 0.0)];
        let weeks = aggregate_weekly(&txs, &[entry(sunday(0), 6.0)]);
        assert!(weeks.is_empty());
    }

    #[test]
    fn test_output_ordered_by_week() {
        let txs = vec![
            Transaction::new(sunday(3), "Food", 10.0),
            Transaction::new(sunday(1), "Food", 10.0),
            Transaction::new(sunday(2), "Food", 10.0),
        ];
        let entries: Vec<_> = (1..=3).map(|w| entry(sunday(w), 5.0)).collect();

        let weeks = aggregate_weekly(&txs, &entries);
        let keys: Vec<_> = weeks.iter().map(|w| w.week.clone()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_savings_rate_placeholder() {
        let txs = vec![Transaction::new(sunday(0), "Food", 123.0)];
        let weeks = aggregate_weekly(&txs, &[entry(sunday(0), 6.0)]);
        assert!((weeks[0].financial.savings_rate - 16.6667).abs() < 0.001);
    }

    #[test]
    fn test_anomaly_against_trailing_baseline() {
        let txs = vec![
            Transaction::new(sunday(0), "Food", 100.0),
            Transaction::new(sunday(1), "Food", 100.0),
            Transaction::new(sunday(2), "Shopping", 400.0),
        ];
        let entries: Vec<_> = (0..3).map(|w| entry(sunday(w), 5.0)).collect();

        let weeks = aggregate_weekly(&txs, &entries);
        assert_eq!(weeks[0].financial.anomaly_spending, 0.0);
        assert_eq!(weeks[1].financial.anomaly_spending, 0.0);
        // Baseline 100, threshold 150
        assert_eq!(weeks[2].financial.anomaly_spending, 250.0);
    }

    #[test]
    fn test_anomaly_window_limits_history() {
        let config = AggregationConfig {
            anomaly_window_weeks: 1,
            ..Default::default()
        };
        let history = [1000.0, 100.0];
        // Only the most recent week (100) counts
        assert_eq!(anomaly_spending(&history, 200.0, &config), 50.0);
    }

    #[test]
    fn test_anomaly_disabled() {
        let config = AggregationConfig {
            anomaly_window_weeks: 0,
            ..Default::default()
        };
        assert_eq!(anomaly_spending(&[10.0, 10.0], 500.0, &config), 0.0);
    }
}

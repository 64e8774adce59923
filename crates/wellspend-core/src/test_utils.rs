//! Test utilities for wellspend-core
//!
//! Deterministic sample data shaped like a few weeks of real usage: shopping
//! climbs steadily while overall wellbeing, mood and calm fall with it, and
//! the other categories wobble independently.

use chrono::{Duration, NaiveDate};

use crate::models::{FinancialMetric, FinancialSnapshot, Transaction, WellbeingEntry};
use crate::scenario::ScenarioSpec;

/// First Sunday of 2024
pub fn first_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date")
}

/// Several transactions per week for `weeks` consecutive weeks
pub fn sample_transactions(weeks: usize) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for i in 0..weeks {
        let sunday = first_sunday() + Duration::weeks(i as i64);
        let food = 80.0 + 10.0 * ((i * 3) % 5) as f64;
        let shopping = 50.0 + 40.0 * i as f64;
        let transport = 30.0 + 5.0 * (i % 3) as f64;
        let entertainment = 20.0 + 15.0 * (i % 2) as f64;

        transactions.push(Transaction::new(sunday, "Food", food * 0.6));
        transactions.push(Transaction::new(sunday + Duration::days(4), "Food", food * 0.4));
        transactions.push(Transaction::new(sunday + Duration::days(1), "Shopping", shopping));
        transactions.push(Transaction::new(sunday + Duration::days(2), "Transport", transport));
        transactions.push(Transaction::new(
            sunday + Duration::days(5),
            "Entertainment",
            entertainment,
        ));
        transactions.push(Transaction::new(sunday + Duration::days(3), "Utilities", 25.0));
    }
    transactions
}

/// One mid-week check-in per week for `weeks` consecutive weeks
pub fn sample_wellbeing(weeks: usize) -> Vec<WellbeingEntry> {
    (0..weeks)
        .map(|i| {
            let step = i as f64;
            WellbeingEntry {
                date: first_sunday() + Duration::weeks(i as i64) + Duration::days(3),
                overall_wellbeing: 9.0 - 0.6 * step,
                stress_level: 3.0 + 0.5 * step,
                sleep_quality: 7.0 - 0.3 * (i % 3) as f64,
                energy_level: 6.0 + 0.5 * ((i * 2) % 3) as f64,
                mood: 8.0 - 0.4 * step,
            }
        })
        .collect()
}

pub fn sample_scenarios() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec::new(
            "Cut shopping by 100",
            FinancialSnapshot::from([(FinancialMetric::ShoppingSpending, -100.0)]),
        ),
        ScenarioSpec::new(
            "More self-care",
            FinancialSnapshot::from([(FinancialMetric::SelfCareSpending, 40.0)]),
        ),
        ScenarioSpec::new("No change", FinancialSnapshot::new()),
    ]
}

//! Week keys used to join spending and wellbeing data
//!
//! Weeks run Sunday through Saturday and are numbered from the week containing
//! January 1st, which is always week 1. This is deliberately not ISO-8601:
//! both data sources must land on identical boundaries, so the numbering is
//! fixed rather than delegated to a calendar library.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier of a calendar week, e.g. `2024-W07`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekKey(String);

impl WeekKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{}-W{:02}", date.year(), week_number(date)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for WeekKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// `ceil((day_of_year + first_weekday + 1) / 7)`, where `day_of_year` is
/// zero-based and `first_weekday` is the weekday of January 1st (0 = Sunday)
pub fn week_number(date: NaiveDate) -> u32 {
    let day_of_year = date.ordinal0();
    let first_weekday = first_weekday_of_year(date);
    (day_of_year + first_weekday + 7) / 7
}

/// Weekday of January 1st of the date's year, 0 = Sunday
fn first_weekday_of_year(date: NaiveDate) -> u32 {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    (weekday - date.ordinal0() as i64).rem_euclid(7) as u32
}

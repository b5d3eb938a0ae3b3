//! Run configuration for the streak pipeline.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default reference date the trailing window ends on.
pub const DEFAULT_END_DATE: &str = "2016-09-30";

/// Default length of the trailing window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// One output flag: the column alias and the streak count that earns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// Output column name (e.g. `5months`).
    pub label: String,
    /// Minimum `consecutive_visits` value required for the flag to be true.
    pub min_streak: u32,
}

impl Threshold {
    pub fn new(label: impl Into<String>, min_streak: u32) -> Self {
        Self {
            label: label.into(),
            min_streak,
        }
    }
}

/// Configuration for a streak report run.
///
/// The thresholds are an ordered list so the aggregation stage and the output
/// schema always agree on column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakOptions {
    /// Inclusive upper bound of the visit window.
    pub end_date: NaiveDate,
    /// Window length; the lower bound is `end_date - window_days`, inclusive.
    pub window_days: i64,
    /// Flags to compute, in output column order.
    pub thresholds: Vec<Threshold>,
}

impl Default for StreakOptions {
    fn default() -> Self {
        Self {
            end_date: default_end_date(),
            window_days: DEFAULT_WINDOW_DAYS,
            thresholds: default_thresholds(),
        }
    }
}

impl StreakOptions {
    /// Set the window end date.
    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    /// Set the window length in days.
    #[must_use]
    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    /// Replace the threshold list.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Inclusive lower bound of the visit window.
    pub fn window_start(&self) -> NaiveDate {
        self.end_date - Duration::days(self.window_days)
    }

    /// Output column names: `patient_id` followed by the flag labels.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = vec![crate::schema::COL_PATIENT_ID.to_string()];
        columns.extend(self.thresholds.iter().map(|t| t.label.clone()));
        columns
    }
}

/// The flags the original report carried: 5, 9, and 11 consecutive visits.
pub fn default_thresholds() -> Vec<Threshold> {
    vec![
        Threshold::new("5months", 5),
        Threshold::new("9months", 9),
        Threshold::new("11months", 11),
    ]
}

fn default_end_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_END_DATE, "%Y-%m-%d").expect("valid constant date")
}

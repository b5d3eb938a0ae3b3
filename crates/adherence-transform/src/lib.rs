//! Streak computation stages for the visit adherence pipeline.
//!
//! Each stage is a standalone function over a [`polars::prelude::LazyFrame`]
//! so it can be tested in isolation; `build_streak_report` composes them into
//! the full pipeline:
//!
//! 1. parse the fixed-width visit date
//! 2. filter to the trailing one-year window
//! 3. compute the day gap to the previous visit per patient
//! 4. count consecutive-day streaks
//! 5. aggregate per patient into threshold flags

pub mod streaks;

pub use streaks::{
    build_streak_report, coerce_report_schema, count_consecutive_visits, days_since_last_visit,
    filter_window, parse_visit_dates, prepare_visits, threshold_flags,
};

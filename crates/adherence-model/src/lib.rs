//! Shared types for the visit adherence pipeline.
//!
//! - **schema**: column names and formats of the input and output CSV files
//! - **options**: run configuration (window bounds, streak thresholds)
//! - **error**: the crate-wide error type

pub mod error;
pub mod options;
pub mod schema;

pub use error::{AdherenceError, Result};
pub use options::{StreakOptions, Threshold};
pub use schema::{
    COL_CONSECUTIVE_VISITS, COL_DAYS_SINCE_LAST_VISIT, COL_EFFECTIVE_FROM_DATE, COL_PATIENT_ID,
    INPUT_DATE_FORMAT, required_input_columns,
};

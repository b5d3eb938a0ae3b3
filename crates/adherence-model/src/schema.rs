//! Column names and formats of the input and output CSV files.
//!
//! The input is an enrollment extract with one row per visit; the raw date is
//! a fixed-width numeric string (`MMddyyyy`, e.g. `09012016`), so it must be
//! read as a string column and parsed explicitly.

/// Patient identifier column, present in both input and output.
pub const COL_PATIENT_ID: &str = "patient_id";

/// Visit date column in the input. Raw values use [`INPUT_DATE_FORMAT`].
pub const COL_EFFECTIVE_FROM_DATE: &str = "effective_from_date";

/// Derived column: day gap to the patient's previous visit (null on the
/// first visit of each patient).
pub const COL_DAYS_SINCE_LAST_VISIT: &str = "days_since_last_visit";

/// Derived column: running streak count, reset to zero whenever the gap to
/// the previous visit is not exactly one day.
pub const COL_CONSECUTIVE_VISITS: &str = "consecutive_visits";

/// strptime format of the raw visit date (`MMddyyyy`).
pub const INPUT_DATE_FORMAT: &str = "%m%d%Y";

/// Columns the input CSV must carry. Extra columns are ignored.
pub fn required_input_columns() -> [&'static str; 2] {
    [COL_PATIENT_ID, COL_EFFECTIVE_FROM_DATE]
}

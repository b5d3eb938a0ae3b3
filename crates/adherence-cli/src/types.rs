use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one pipeline run, for the summary table.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Rows read from the input file.
    pub rows_read: usize,
    /// Rows remaining after date parsing and the window filter.
    pub rows_in_window: usize,
    /// Distinct patients in the report.
    pub patients: usize,
    /// Patients flagged per threshold, in output column order.
    pub flagged: Vec<FlagCount>,
    /// False when `--dry-run` skipped the output file.
    pub written: bool,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct FlagCount {
    pub label: String,
    pub min_streak: u32,
    pub patients: usize,
}

//! CLI argument definitions for the adherence report tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use adherence_model::options::{DEFAULT_END_DATE, DEFAULT_WINDOW_DAYS};

#[derive(Parser)]
#[command(
    name = "adherence",
    version,
    about = "Visit Adherence - Flag patients with consecutive-visit streaks",
    long_about = "Compute per-patient consecutive-visit streak flags from an enrollment CSV.\n\n\
                  Visits inside a trailing one-year window are scanned for runs of\n\
                  consecutive daily visits; patients whose longest run reaches the 5 / 9 / 11\n\
                  thresholds are flagged in the output CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the streak pipeline over an enrollment CSV.
    Run(RunArgs),

    /// Print the expected input and produced output schemas.
    Schema,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the enrollment CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV path (default: output/result.csv next to the input).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Inclusive end date of the trailing visit window.
    #[arg(long = "end-date", value_name = "YYYY-MM-DD", default_value = DEFAULT_END_DATE)]
    pub end_date: NaiveDate,

    /// Window length in days; the window starts at end-date minus this many days.
    #[arg(long = "window-days", value_name = "DAYS", default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: i64,

    /// Compute and print the summary without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

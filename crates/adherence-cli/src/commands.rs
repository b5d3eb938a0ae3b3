use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::Table;

use adherence_cli::pipeline::{RunConfig, run_pipeline};
use adherence_cli::summary::apply_table_style;
use adherence_cli::types::RunResult;
use adherence_model::{
    COL_EFFECTIVE_FROM_DATE, COL_PATIENT_ID, INPUT_DATE_FORMAT, StreakOptions,
};

use crate::cli::RunArgs;

pub fn run_report(args: &RunArgs) -> Result<RunResult> {
    let options = StreakOptions::default()
        .with_end_date(args.end_date)
        .with_window_days(args.window_days);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    let config = RunConfig {
        input: args.input.clone(),
        output,
        options,
        dry_run: args.dry_run,
    };
    run_pipeline(&config)
}

/// Mirrors the original report layout: an `output/` directory next to the
/// input file.
fn default_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("output")
        .join("result.csv")
}

pub fn run_schema() -> Result<()> {
    let options = StreakOptions::default();

    let mut input_table = Table::new();
    input_table.set_header(vec!["Input column", "Type", "Notes"]);
    apply_table_style(&mut input_table);
    input_table.add_row(vec![
        COL_EFFECTIVE_FROM_DATE.to_string(),
        "string".to_string(),
        format!("visit date, fixed format {INPUT_DATE_FORMAT} (MMddyyyy)"),
    ]);
    input_table.add_row(vec![COL_PATIENT_ID, "string", "patient identifier"]);
    println!("Input (CSV with header, extra columns ignored):");
    println!("{input_table}");

    let mut output_table = Table::new();
    output_table.set_header(vec!["Output column", "Type", "Notes"]);
    apply_table_style(&mut output_table);
    output_table.add_row(vec![COL_PATIENT_ID, "string", "patient identifier"]);
    for threshold in &options.thresholds {
        output_table.add_row(vec![
            threshold.label.clone(),
            "boolean".to_string(),
            format!("max consecutive-visit count >= {}", threshold.min_streak),
        ]);
    }
    println!("Output (CSV with header, sorted by {COL_PATIENT_ID}):");
    println!("{output_table}");
    Ok(())
}

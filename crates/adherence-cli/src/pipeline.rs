//! Streak report pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: validate the header and read the enrollment CSV
//! 2. **Transform**: parse dates, filter the window, compute gaps and streaks
//! 3. **Aggregate**: per-patient threshold flags
//! 4. **Output**: write the report CSV (skipped on dry runs)

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, IntoLazy, SerWriter};
use tracing::{info, info_span};

use adherence_ingest::read_visits;
use adherence_model::StreakOptions;
use adherence_transform::{coerce_report_schema, prepare_visits, threshold_flags};

use crate::types::{FlagCount, RunResult};

/// Everything a run needs: paths and window/threshold configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: StreakOptions,
    pub dry_run: bool,
}

/// Execute the full pipeline and return the run summary.
pub fn run_pipeline(config: &RunConfig) -> Result<RunResult> {
    let started = Instant::now();
    let span = info_span!("run", input = %config.input.display());
    let _guard = span.enter();

    // Stage 1: Ingest
    let input_df = read_visits(&config.input).context("ingest enrollment csv")?;
    let rows_read = input_df.height();
    info!(rows = rows_read, "ingested enrollment csv");

    // Stage 2: Transform (parse, window, gaps, streak counts)
    let visit_frame = prepare_visits(input_df.lazy(), &config.options)
        .collect()
        .context("compute visit streaks")?;
    let rows_in_window = visit_frame.height();
    info!(
        rows = rows_in_window,
        window_start = %config.options.window_start(),
        window_end = %config.options.end_date,
        "filtered to visit window"
    );

    // Stage 3: Aggregate
    let mut report = coerce_report_schema(
        threshold_flags(visit_frame.lazy(), &config.options),
        &config.options,
    )
    .collect()
    .context("aggregate threshold flags")?;
    let patients = report.height();
    let flagged = flag_counts(&report, &config.options)?;
    info!(patients, "aggregated threshold flags");

    // Stage 4: Output
    let written = if config.dry_run {
        info!("dry run, skipping output");
        false
    } else {
        write_report(&mut report, &config.output)?;
        true
    };

    Ok(RunResult {
        input: config.input.clone(),
        output: config.output.clone(),
        rows_read,
        rows_in_window,
        patients,
        flagged,
        written,
        elapsed: started.elapsed(),
    })
}

/// Count flagged patients per threshold column.
fn flag_counts(report: &DataFrame, options: &StreakOptions) -> Result<Vec<FlagCount>> {
    let mut counts = Vec::with_capacity(options.thresholds.len());
    for threshold in &options.thresholds {
        let flags = report
            .column(threshold.label.as_str())
            .with_context(|| format!("flag column {}", threshold.label))?
            .bool()
            .with_context(|| format!("flag column {} dtype", threshold.label))?;
        counts.push(FlagCount {
            label: threshold.label.clone(),
            min_streak: threshold.min_streak,
            patients: flags.sum().unwrap_or(0) as usize,
        });
    }
    Ok(counts)
}

/// Write the report CSV with header, truncating any previous output.
fn write_report(report: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir: {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("create output: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(report)
        .with_context(|| format!("write output: {}", path.display()))?;
    info!(path = %path.display(), "wrote streak report");
    Ok(())
}

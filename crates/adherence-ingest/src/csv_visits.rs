use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{CsvReadOptions, DataFrame, LazyCsvReader, LazyFileListReader, LazyFrame};
use polars::prelude::{PlPath, SerReader};

use adherence_model::{AdherenceError, Result, required_input_columns};

/// Header row of an enrollment CSV, normalized for lookup.
#[derive(Debug, Clone)]
pub struct VisitSchema {
    pub headers: Vec<String>,
}

impl VisitSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read and validate the header row without touching the data rows.
///
/// Fails with [`AdherenceError::Io`] when the file is missing and
/// [`AdherenceError::Message`] when a required column (`patient_id`,
/// `effective_from_date`) is absent.
pub fn read_visit_schema(path: &Path) -> Result<VisitSchema> {
    if !path.exists() {
        return Err(AdherenceError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("enrollment csv not found: {}", path.display()),
        )));
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|error| {
            AdherenceError::Message(format!("read csv {}: {error}", path.display()))
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| {
            AdherenceError::Message(format!("read header {}: {error}", path.display()))
        })?
        .iter()
        .map(normalize_header)
        .collect();
    let schema = VisitSchema { headers };

    let missing: Vec<&str> = required_input_columns()
        .into_iter()
        .filter(|name| !schema.has_column(name))
        .collect();
    if !missing.is_empty() {
        return Err(AdherenceError::Message(format!(
            "{}: missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )));
    }
    Ok(schema)
}

/// Scan the enrollment CSV lazily.
///
/// Schema inference is disabled so every column comes back as a string;
/// otherwise the fixed-width `MMddyyyy` date would be inferred as an integer
/// and lose its leading zero.
pub fn scan_visits(path: &Path) -> Result<LazyFrame> {
    read_visit_schema(path)?;
    let path_str = path.to_string_lossy();
    let lf = LazyCsvReader::new(PlPath::new(&path_str))
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?;
    tracing::debug!(path = %path.display(), "scanned enrollment csv");
    Ok(lf)
}

/// Read the enrollment CSV eagerly, all columns as strings.
pub fn read_visits(path: &Path) -> Result<DataFrame> {
    read_visit_schema(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    tracing::debug!(path = %path.display(), rows = df.height(), "read enrollment csv");
    Ok(df)
}

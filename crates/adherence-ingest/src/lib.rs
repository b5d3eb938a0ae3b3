//! CSV ingestion for the visit adherence pipeline.
//!
//! The enrollment extract carries the visit date as a fixed-width numeric
//! string, so every reader here forces string typing on all columns and
//! leaves date parsing to the transform stage.

pub mod csv_visits;

pub use csv_visits::{VisitSchema, read_visit_schema, read_visits, scan_visits};

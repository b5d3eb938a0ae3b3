//! CLI library components for the visit adherence pipeline.

pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdherenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AdherenceError>;

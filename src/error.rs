use crate::scorer::types::Axis;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerfError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    /// A collaborator handed the engine data that breaks the measurement contract.
    #[error("Data Validation Error: {0}")]
    Validation(String),

    /// Media probing failed, so there is nothing to report on.
    #[error("Media Error: {0}")]
    Media(String),
}

pub type PsResult<T> = Result<T, PerfError>;

/// Upstream feature extraction for one axis did not produce measurements.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{axis} extraction failed: {message}")]
pub struct ExtractionFailure {
    pub axis: Axis,
    pub message: String,
}

impl ExtractionFailure {
    pub fn new(axis: Axis, message: impl Into<String>) -> Self {
        Self {
            axis,
            message: message.into(),
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Post-condition failed: {0}")]
    PostConditionFailed(String),

    #[error("Test data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Step index out of order: expected {expected}, got {got}")]
    DuplicateIndex { expected: usize, got: usize },

    #[error("Step {0} is still pending")]
    StepNotFinalized(usize),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse test data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid report artifact: {0}")]
    InvalidReport(String),
}

impl Error {
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        Error::Timeout {
            what: what.into(),
            after,
        }
    }

    /// True for failures caused by a bounded wait expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

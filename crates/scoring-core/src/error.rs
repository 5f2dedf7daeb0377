use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Company data failed a critical validation check.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Weight configuration has a critical defect.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A pillar task panicked or was cancelled before completing.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

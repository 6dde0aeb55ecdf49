//! Error types for the CLI

use structural_clone::CloneError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input failed
    #[error("File error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input is not valid JSON
    #[error("Parse error: {0}")]
    ParseError(#[from] CloneError),

    /// Arguments do not fit the input
    #[error("Usage error: {0}")]
    UsageError(String),

    /// Writing the report failed
    #[error("Report error: {0}")]
    ReportError(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

use std::path::PathBuf;

use thiserror::Error;

/// Every way an extraction run can fail. Each variant aborts the run before
/// an output file is produced.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input missing, unreadable, or not a workbook.
    #[error("failed to read workbook {}: {reason}", path.display())]
    Resource { path: PathBuf, reason: String },

    /// Rejected before any processing starts (bad extension, bad option).
    #[error("{0}")]
    Validation(String),

    /// An expected column or header label is absent.
    #[error("missing column: {column}")]
    Column { column: String },

    #[error("failed to write report {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl ExtractError {
    pub fn resource(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExtractError::Resource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExtractError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn column(column: impl Into<String>) -> Self {
        ExtractError::Column {
            column: column.into(),
        }
    }
}

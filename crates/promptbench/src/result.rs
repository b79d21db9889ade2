//! Result and error types for promptbench.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for promptbench operations
pub type PromptbenchResult<T> = Result<T, PromptbenchError>;

/// Fatal errors that abort a whole batch.
///
/// Per-row backend failures are not represented here; they are recorded on
/// the row itself (see [`crate::backend::BackendError`]).
#[derive(Debug, Error)]
pub enum PromptbenchError {
    /// Input file does not exist
    #[error("Could not find input file {}", path.display())]
    InputNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Input table lacks a column the tool needs
    #[error("Input file does not contain a '{column}' column")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// Prompt template failed validation
    #[error("Invalid prompt template: {message}")]
    Template {
        /// Error message
        message: String,
    },

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Log pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend could not be set up (as opposed to a single failed row)
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),
}

impl PromptbenchError {
    /// Create a missing-column error
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a template error
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }
}

//! Error types for the CLI

use crate::logging::LoggingError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Required external program is not installed
    #[error("{program} is not installed. Install it with: {hint}")]
    MissingExecutable {
        /// Program name
        program: String,
        /// Install instructions
        hint: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging setup error
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Promptbench library error
    #[error(transparent)]
    Promptbench(#[from] promptbench::PromptbenchError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing executable error
    #[must_use]
    pub fn missing_executable(program: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingExecutable {
            program: program.into(),
            hint: hint.into(),
        }
    }
}

impl From<promptbench::BackendError> for CliError {
    fn from(err: promptbench::BackendError) -> Self {
        Self::Promptbench(err.into())
    }
}

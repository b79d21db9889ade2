//! Text-generation and token-counting backends.
//!
//! - **`ClaudeCli`**: drives the `claude` executable in print mode
//! - **`GeminiClient`**: Vertex AI `generateContent` / `countTokens` REST API
//!
//! Both are reached through the [`TextGenerator`] and [`TokenCounter`]
//! traits so the row processor and the annotator can run against mocks.

pub mod claude;
pub mod gemini;

pub use claude::ClaudeCli;
pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;

/// Errors from a single backend call.
///
/// The `Display` text is what gets stored in a row's `error` column; the
/// variant survives for logging through [`BackendError::kind`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// External executable could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// External executable exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    ProcessFailed {
        /// Program that was invoked
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Server returned an error status.
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Response was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Backend answered but flagged its own result as an error.
    #[error("Backend reported an error: {0}")]
    Reported(String),
    /// Response had no usable text.
    #[error("Response contained no text: {0}")]
    MissingContent(String),
    /// Credentials could not be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl BackendError {
    /// Short category name used in log events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn",
            Self::ProcessFailed { .. } => "process",
            Self::Http(_) => "transport",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::Reported(_) => "reported",
            Self::MissingContent(_) => "missing_content",
            Self::Auth(_) => "auth",
        }
    }
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for progress and log output.
    fn name(&self) -> &str;

    /// Generate a response for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Something that counts tokens in a text.
#[async_trait]
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    async fn count_tokens(&self, text: &str) -> Result<u64, BackendError>;
}

/// Count tokens, answering 0 for blank text without calling the backend.
pub async fn count_or_zero<C>(counter: &C, text: &str) -> Result<u64, BackendError>
where
    C: TokenCounter + ?Sized,
{
    if text.trim().is_empty() {
        return Ok(0);
    }
    counter.count_tokens(text).await
}

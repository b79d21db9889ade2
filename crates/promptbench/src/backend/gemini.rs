//! Gemini client for the Vertex AI REST API.
//!
//! Uses `generateContent` for text and `countTokens` for token counts,
//! authenticating with an OAuth bearer token.

use super::{BackendError, TextGenerator, TokenCounter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Vertex AI location.
pub const DEFAULT_LOCATION: &str = "global";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Google Cloud project id
    pub project: String,
    /// Vertex AI location (`global`, `us-central1`, ...)
    pub location: String,
    /// Model identifier
    pub model: String,
    /// OAuth bearer token
    pub access_token: String,
    /// Overrides the endpoint derived from `location`
    pub base_url: Option<String>,
}

impl GeminiConfig {
    /// Settings for `project` with default location and model.
    #[must_use]
    pub fn new(project: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            access_token: access_token.into(),
            base_url: None,
        }
    }

    /// Endpoint root: the global host for `global`, a regional host otherwise.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.location == "global" => "https://aiplatform.googleapis.com".to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

/// Obtain a bearer token from `gcloud auth print-access-token`.
pub async fn access_token_from_gcloud() -> Result<String, BackendError> {
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| BackendError::Auth(format!("could not run gcloud: {e}")))?;
    if !output.status.success() {
        return Err(BackendError::Auth(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(BackendError::Auth("gcloud printed an empty token".to_string()));
    }
    Ok(token)
}

#[derive(Debug, Serialize)]
struct ContentsRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> ContentsRequest<'a> {
    const fn user_text(text: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text }],
            }],
        }
    }
}

/// `generateContent` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Set when the prompt itself was blocked
    pub prompt_feedback: Option<serde_json::Value>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content
    pub content: Option<CandidateContent>,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    /// Content parts; only text parts are used
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A content part.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    /// Text of a text part
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// `countTokens` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    /// Token count of the request contents
    #[serde(default)]
    pub total_tokens: u64,
}

/// Vertex AI Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client with a 120 s request timeout.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        Self::with_client(config, client)
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Returns the model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{method}",
            self.config.endpoint(),
            self.config.project,
            self.config.location,
            self.config.model,
        )
    }

    async fn post<T>(&self, method: &str, text: &str) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.method_url(method);
        tracing::debug!(%url, text_len = text.len(), "calling gemini");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&ContentsRequest::user_text(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let response: GenerateContentResponse = self.post("generateContent", prompt).await?;
        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .or_else(|| response.prompt_feedback.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "no candidates".to_string());
            BackendError::MissingContent(reason)
        })
    }
}

#[async_trait]
impl TokenCounter for GeminiClient {
    async fn count_tokens(&self, text: &str) -> Result<u64, BackendError> {
        let response: CountTokensResponse = self.post("countTokens", text).await?;
        Ok(response.total_tokens)
    }
}

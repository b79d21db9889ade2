//! Backend that shells out to the `claude` command-line tool.
//!
//! Each prompt runs `claude -p <prompt> --output-format json` and reads the
//! `result` field of the JSON document printed on stdout.

use super::{BackendError, TextGenerator};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

/// Default executable name.
pub const CLAUDE_PROGRAM: &str = "claude";

/// Shown when the executable is missing.
pub const INSTALL_HINT: &str = "npm install -g @anthropic-ai/claude-code";

/// JSON printed by `claude --output-format json`.
#[derive(Debug, Deserialize)]
struct PrintOutput {
    #[serde(default)]
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// `claude` executable wrapper.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    program: String,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCli {
    /// Use `claude` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(CLAUDE_PROGRAM)
    }

    /// Use a specific executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the executable this backend runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `<program> --version` and return its trimmed output.
    pub async fn ensure_installed(&self) -> Result<String, BackendError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(BackendError::ProcessFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for ClaudeCli {
    fn name(&self) -> &str {
        "claude"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(program = %self.program, prompt_len = prompt.len(), "running claude");
        let output = Command::new(&self.program)
            .args(["-p", prompt, "--output-format", "json"])
            .output()
            .await
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::ProcessFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let parsed: PrintOutput = serde_json::from_slice(&output.stdout)?;
        if parsed.is_error {
            return Err(BackendError::Reported(parsed.result));
        }
        Ok(parsed.result)
    }
}

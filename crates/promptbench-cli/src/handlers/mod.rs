//! Command handlers - one module per subcommand
//!
//! Shared pieces live here: template resolution, Gemini client setup and
//! the run-and-write step common to both prompt runners.

pub mod claude;
pub mod convert;
pub mod gemini;
pub mod tokens;

pub use claude::execute_claude;
pub use convert::execute_convert;
pub use gemini::execute_gemini;
pub use tokens::execute_tokens;

use crate::commands::GeminiArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use promptbench::backend::gemini::access_token_from_gcloud;
use promptbench::{
    table, BatchSummary, GeminiClient, GeminiConfig, LabelSet, PromptTemplate, RowProcessor,
    TableSchema,
};
use std::path::Path;
use std::time::Instant;

/// Validate the user's template, or fall back to `default`.
pub fn resolve_template(custom: Option<&str>, default: &str) -> CliResult<PromptTemplate> {
    Ok(PromptTemplate::parse(custom.unwrap_or(default))?)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build the Gemini connection settings from flags and environment.
///
/// Without an explicit access token, one is requested from `gcloud`.
pub async fn gemini_config(args: &GeminiArgs) -> CliResult<GeminiConfig> {
    let project = non_blank(args.project.as_ref()).ok_or_else(|| {
        CliError::config("Google Cloud project not set; pass --project or set GOOGLE_CLOUD_PROJECT")
    })?;
    let location = args.location.trim();
    if location.is_empty() {
        return Err(CliError::invalid_argument("--location must not be empty"));
    }

    let access_token = match non_blank(args.access_token.as_ref()) {
        Some(token) => token,
        None => {
            tracing::debug!("no access token given, asking gcloud");
            access_token_from_gcloud().await?
        }
    };

    let mut config = GeminiConfig::new(project, access_token);
    config.location = location.to_string();
    config.model.clone_from(&args.model);
    config.base_url = non_blank(args.endpoint.as_ref());
    Ok(config)
}

/// Gemini client for `args`.
pub async fn gemini_client(args: &GeminiArgs) -> CliResult<GeminiClient> {
    let config = gemini_config(args).await?;
    tracing::info!(
        project = %config.project,
        location = %config.location,
        model = %config.model,
        "using gemini"
    );
    Ok(GeminiClient::new(config))
}

/// Process every prompt, write the table once, print the summary.
pub async fn run_batch(
    config: &CliConfig,
    processor: &RowProcessor<'_>,
    prompts: &[String],
    output: &Path,
    labels: LabelSet,
) -> CliResult<BatchSummary> {
    let reporter = config.reporter();
    let started = Instant::now();

    let rows = processor.process_all(prompts, &reporter).await;
    let schema = if processor.counts_tokens() {
        TableSchema::WithTokens
    } else {
        TableSchema::Basic
    };
    table::write_table(output, &rows, schema, &labels.labels())?;

    let summary = BatchSummary::of(&rows);
    reporter.summary(&summary, output, started.elapsed());
    Ok(summary)
}

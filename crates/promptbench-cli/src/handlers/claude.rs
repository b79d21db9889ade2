//! Handler for `promptbench claude`.

use super::{resolve_template, run_batch};
use crate::commands::ClaudeArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use promptbench::backend::claude::{CLAUDE_PROGRAM, INSTALL_HINT};
use promptbench::template::DEFAULT_SUMMARY_TEMPLATE;
use promptbench::{table, ClaudeCli, RowProcessor};

/// Execute `promptbench claude`.
///
/// The executable must answer `--version` before any prompt is read.
pub async fn execute_claude(config: &CliConfig, args: &ClaudeArgs) -> CliResult<()> {
    execute_with(config, args, &ClaudeCli::new()).await
}

pub(crate) async fn execute_with(
    config: &CliConfig,
    args: &ClaudeArgs,
    claude: &ClaudeCli,
) -> CliResult<()> {
    let template = resolve_template(args.prompt_template.as_deref(), DEFAULT_SUMMARY_TEMPLATE)?;

    let version = claude.ensure_installed().await.map_err(|e| {
        tracing::debug!(error = %e, "version check failed");
        CliError::missing_executable(CLAUDE_PROGRAM, INSTALL_HINT)
    })?;
    tracing::info!(program = claude.program(), %version, "claude found");
    config.reporter().info(&format!("Using {} {version}", claude.program()));

    let prompts = table::read_prompts(&args.input)?;
    let processor = RowProcessor::new(claude, template);
    run_batch(config, &processor, &prompts, &args.output, args.labels.into()).await?;
    Ok(())
}

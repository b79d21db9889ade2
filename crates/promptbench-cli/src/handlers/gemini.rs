//! Handler for `promptbench gemini`.

use super::{gemini_client, resolve_template, run_batch};
use crate::commands::GeminiRunArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use promptbench::template::PASSTHROUGH_TEMPLATE;
use promptbench::{table, RowProcessor};

/// Execute `promptbench gemini`: generate and count tokens inline.
pub async fn execute_gemini(config: &CliConfig, args: &GeminiRunArgs) -> CliResult<()> {
    let template = resolve_template(args.prompt_template.as_deref(), PASSTHROUGH_TEMPLATE)?;
    let prompts = table::read_prompts(&args.input)?;
    let client = gemini_client(&args.gemini).await?;

    let processor = RowProcessor::new(&client, template).with_counter(&client);
    run_batch(config, &processor, &prompts, &args.output, args.labels.into()).await?;
    Ok(())
}

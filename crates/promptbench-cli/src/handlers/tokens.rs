//! Handler for `promptbench tokens`.

use super::gemini_client;
use crate::commands::TokensArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use promptbench::{table, BatchSummary, LabelSet, TableSchema, TokenAnnotator, TokenCounter};
use std::time::Instant;

/// Execute `promptbench tokens`.
///
/// The input table is read and checked before any credentials are fetched.
pub async fn execute_tokens(config: &CliConfig, args: &TokensArgs) -> CliResult<()> {
    let rows = table::read_result_table(&args.input)?;
    let client = gemini_client(&args.gemini).await?;
    annotate_file(config, args, rows, &client).await
}

async fn annotate_file(
    config: &CliConfig,
    args: &TokensArgs,
    rows: Vec<promptbench::Row>,
    counter: &dyn TokenCounter,
) -> CliResult<()> {
    let reporter = config.reporter().annotating();
    let started = Instant::now();

    let rows = TokenAnnotator::new(counter)
        .annotate_all(rows, &reporter)
        .await;
    let labels = LabelSet::from(args.labels).labels();
    table::write_table(&args.output, &rows, TableSchema::WithTokens, &labels)?;

    reporter.summary(&BatchSummary::of(&rows), &args.output, started.elapsed());
    Ok(())
}

//! Handler for `promptbench convert`.

use crate::commands::ConvertArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use promptbench::{table, LabelSet};

/// Execute `promptbench convert`: text log in, table out.
pub fn execute_convert(config: &CliConfig, args: &ConvertArgs) -> CliResult<usize> {
    let labels = LabelSet::from(args.labels).labels();
    let log = table::read_log(&args.input, &labels)?;
    if log.rows.is_empty() {
        tracing::debug!(input = %args.input.display(), row = labels.row, "no row sections found");
        config.reporter().warning(&format!(
            "No '=== {} N ===' sections found in {}",
            labels.row,
            args.input.display()
        ));
    }

    table::write_table(&args.output, &log.rows, log.schema, &labels)?;

    if !config.verbosity.is_quiet() {
        println!(
            "Conversion complete: {} rows converted to {}",
            log.rows.len(),
            args.output.display()
        );
    }
    Ok(log.rows.len())
}

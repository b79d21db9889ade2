//! Promptbench CLI: batch prompt runner
//!
//! ## Usage
//!
//! ```bash
//! promptbench claude prompts.csv -o output.csv     # Summarize with the claude CLI
//! promptbench gemini prompts.csv -o results.json   # Gemini, with token counts
//! promptbench tokens output.csv                    # Add token counts to a table
//! promptbench convert output.txt -o output.csv     # Text log back to a table
//! ```

use clap::Parser;
use promptbench_cli::{
    handlers, init_logging, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    console::set_colors_enabled(config.color.should_color());
    init_logging(config.verbosity.default_log_filter())?;

    match cli.command {
        Commands::Claude(args) => block_on(handlers::execute_claude(&config, &args)),
        Commands::Gemini(args) => block_on(handlers::execute_gemini(&config, &args)),
        Commands::Tokens(args) => block_on(handlers::execute_tokens(&config, &args)),
        Commands::Convert(args) => handlers::execute_convert(&config, &args).map(|_| ()),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn block_on<F>(future: F) -> CliResult<()>
where
    F: std::future::Future<Output = CliResult<()>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create async runtime: {e}")))?;
    rt.block_on(future)
}

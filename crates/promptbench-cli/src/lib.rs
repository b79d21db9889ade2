//! Promptbench CLI Library
//!
//! Command-line interface for the promptbench batch prompt runner.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    ClaudeArgs, Cli, ColorArg, Commands, ConvertArgs, GeminiArgs, GeminiRunArgs, LabelArg,
    TokensArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LoggingError};
pub use output::ProgressReporter;

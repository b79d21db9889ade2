//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use promptbench::LabelSet;
use std::path::PathBuf;

/// Promptbench: run CSV prompt batches against LLM backends
#[derive(Parser, Debug)]
#[command(name = "promptbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send each prompt to the `claude` command-line tool
    Claude(ClaudeArgs),

    /// Send each prompt to Gemini on Vertex AI, counting tokens inline
    Gemini(GeminiRunArgs),

    /// Add token counts to an existing result table
    Tokens(TokensArgs),

    /// Convert a text result log into a CSV or JSON table
    Convert(ConvertArgs),
}

/// Arguments for the claude command
#[derive(Args, Debug)]
pub struct ClaudeArgs {
    /// CSV file with a `prompt_text` column
    #[arg(default_value = "prompts.csv")]
    pub input: PathBuf,

    /// Output file (.csv, .json, anything else is a text log)
    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,

    /// Prompt template; must contain {prompt_text}
    #[arg(short = 'p', long)]
    pub prompt_template: Option<String>,

    /// Label words for text-log output
    #[arg(long, value_enum, default_value = "english")]
    pub labels: LabelArg,
}

/// Connection settings shared by the Gemini-backed commands
#[derive(Args, Debug, Clone)]
pub struct GeminiArgs {
    /// Model identifier
    #[arg(long, default_value = promptbench::backend::gemini::DEFAULT_MODEL)]
    pub model: String,

    /// Google Cloud project id
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project: Option<String>,

    /// Vertex AI location
    #[arg(long, env = "GOOGLE_CLOUD_LOCATION", default_value = promptbench::backend::gemini::DEFAULT_LOCATION)]
    pub location: String,

    /// OAuth access token (default: `gcloud auth print-access-token`)
    #[arg(long, env = "GOOGLE_CLOUD_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Override the API endpoint root
    #[arg(long, env = "PROMPTBENCH_GEMINI_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// Arguments for the gemini command
#[derive(Args, Debug)]
pub struct GeminiRunArgs {
    /// CSV file with a `prompt_text` column
    #[arg(default_value = "prompts.csv")]
    pub input: PathBuf,

    /// Output file (.csv, .json, anything else is a text log)
    #[arg(short, long, default_value = "output_gemini.csv")]
    pub output: PathBuf,

    /// Prompt template; must contain {prompt_text}
    #[arg(short = 'p', long)]
    pub prompt_template: Option<String>,

    /// Label words for text-log output
    #[arg(long, value_enum, default_value = "english")]
    pub labels: LabelArg,

    #[command(flatten)]
    pub gemini: GeminiArgs,
}

/// Arguments for the tokens command
#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Result table with original_text, processed_text and error columns
    #[arg(default_value = "output.csv")]
    pub input: PathBuf,

    /// Output file (.csv, .json, anything else is a text log)
    #[arg(short, long, default_value = "output_with_tokens.csv")]
    pub output: PathBuf,

    /// Label words for text-log output
    #[arg(long, value_enum, default_value = "english")]
    pub labels: LabelArg,

    #[command(flatten)]
    pub gemini: GeminiArgs,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Text log written by `claude` or `gemini`
    #[arg(default_value = "output.txt")]
    pub input: PathBuf,

    /// Output table (.csv or .json)
    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,

    /// Label words used in the log
    #[arg(long, value_enum, default_value = "english")]
    pub labels: LabelArg,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Text-log label preset
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelArg {
    /// `Row`, `Original text:`, `Processed text:`
    #[default]
    English,
    /// `Fila`, `Texto original:`, `Texto procesado:`
    Spanish,
}

impl From<LabelArg> for LabelSet {
    fn from(arg: LabelArg) -> Self {
        match arg {
            LabelArg::English => Self::English,
            LabelArg::Spanish => Self::Spanish,
        }
    }
}

//! Promptbench: batch prompt runner for text-generation backends
//!
//! Reads prompts from a CSV table, sends each through a prompt template to
//! a backend, and writes one result row per prompt. Result tables can later
//! be annotated with token counts, and text logs converted back to tables.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌──────────────┐    ┌────────────┐    ┌────────────┐
//! │ prompts    │    │ RowProcessor │    │ Row table  │    │ .csv       │
//! │ .csv       │───►│ + template   │───►│ (Vec<Row>) │───►│ .json      │
//! │            │    │ + backend    │    │            │    │ text log   │
//! └────────────┘    └──────────────┘    └────────────┘    └────────────┘
//!                                            ▲   │
//!                          textlog::parse ───┘   └─── TokenAnnotator
//! ```
//!
//! # Example
//!
//! ```no_run
//! use promptbench::{table, ClaudeCli, PromptTemplate, RowProcessor, SilentProgress, TableSchema};
//! use promptbench::textlog::LogLabels;
//! use std::path::Path;
//!
//! # async fn run() -> promptbench::PromptbenchResult<()> {
//! let prompts = table::read_prompts(Path::new("prompts.csv"))?;
//! let claude = ClaudeCli::new();
//! let processor = RowProcessor::new(&claude, PromptTemplate::default());
//! let rows = processor.process_all(&prompts, &SilentProgress).await;
//! table::write_table(Path::new("output.csv"), &rows, TableSchema::Basic, &LogLabels::ENGLISH)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::significant_drop_tightening))]

pub mod annotate;
pub mod backend;
pub mod processor;
mod result;
pub mod row;
pub mod table;
pub mod template;
pub mod textlog;

pub use annotate::TokenAnnotator;
pub use backend::{
    BackendError, ClaudeCli, GeminiClient, GeminiConfig, TextGenerator, TokenCounter,
};
pub use processor::{BatchProgress, BatchSummary, RowProcessor, SilentProgress};
pub use result::{PromptbenchError, PromptbenchResult};
pub use row::{Row, RowOutcome, RowRecord, TableSchema, TokenCounts};
pub use table::OutputFormat;
pub use template::PromptTemplate;
pub use textlog::{LabelSet, LogLabels};

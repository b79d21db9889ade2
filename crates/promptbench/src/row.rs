//! Row model shared by every tool.
//!
//! A [`Row`] is built once per input line, gets its [`RowOutcome`] set once,
//! and is then serialized. The flat [`RowRecord`] is the on-disk shape used
//! by the CSV and JSON writers and by the CSV reader of the token annotator.

use serde::{Deserialize, Serialize};

/// Placeholder stored as processed text when the prompt was blank.
pub const NO_CONTENT: &str = "No content";

/// Display prefix length of `original_text`, in characters.
pub const ORIGINAL_TEXT_LIMIT: usize = 100;

/// Marker appended to a truncated `original_text`.
pub const ELLIPSIS: &str = "...";

/// Column names, in output order.
pub const COLUMNS: [&str; 6] = [
    "row_number",
    "original_text",
    "processed_text",
    "error",
    "original_token_count",
    "processed_token_count",
];

/// How a row ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Backend answered (or the prompt was blank and got [`NO_CONTENT`])
    Processed {
        /// Response text
        text: String,
    },
    /// Backend call failed
    Failed {
        /// Human-readable failure description
        error: String,
    },
}

impl RowOutcome {
    /// Successful outcome
    #[must_use]
    pub fn processed(text: impl Into<String>) -> Self {
        Self::Processed { text: text.into() }
    }

    /// Failed outcome
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Processed text, if any
    #[must_use]
    pub fn processed_text(&self) -> Option<&str> {
        match self {
            Self::Processed { text } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    /// Error description, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Processed { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Whether the backend call failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Token counts for a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    /// Tokens in the original prompt
    pub original: u64,
    /// Tokens in the processed text
    pub processed: u64,
}

/// One unit of correspondence between a prompt and its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position in the input
    pub row_number: usize,
    /// Display copy of the prompt
    pub original_text: String,
    /// Result of the backend call
    pub outcome: RowOutcome,
    /// Token counts, for token-annotated tables only
    pub tokens: Option<TokenCounts>,
}

impl Row {
    /// Create a row without token counts
    #[must_use]
    pub fn new(row_number: usize, original_text: impl Into<String>, outcome: RowOutcome) -> Self {
        Self {
            row_number,
            original_text: original_text.into(),
            outcome,
            tokens: None,
        }
    }

    /// Attach token counts
    #[must_use]
    pub const fn with_tokens(mut self, tokens: TokenCounts) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

/// Shorten a prompt for display: the first [`ORIGINAL_TEXT_LIMIT`]
/// characters plus [`ELLIPSIS`] when longer, otherwise unchanged.
#[must_use]
pub fn truncate_for_display(prompt: &str) -> String {
    match prompt.char_indices().nth(ORIGINAL_TEXT_LIMIT) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &prompt[..cut]),
        None => prompt.to_string(),
    }
}

/// Which columns a table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSchema {
    /// `row_number`, `original_text`, `processed_text`, `error`
    #[default]
    Basic,
    /// Basic columns plus both token counts
    WithTokens,
}

impl TableSchema {
    /// Column names of this schema, in order
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &COLUMNS[..4],
            Self::WithTokens => &COLUMNS,
        }
    }

    /// Schema that fits every row: token columns if any row has counts
    #[must_use]
    pub fn infer(rows: &[Row]) -> Self {
        if rows.iter().any(|r| r.tokens.is_some()) {
            Self::WithTokens
        } else {
            Self::Basic
        }
    }
}

/// Flat serialized form of a [`Row`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    /// 1-based position
    pub row_number: usize,
    /// Display copy of the prompt
    pub original_text: String,
    /// Response text, `null` when the row failed
    pub processed_text: Option<String>,
    /// Failure description, `null` on success
    pub error: Option<String>,
    /// Tokens in the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_token_count: Option<u64>,
    /// Tokens in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_token_count: Option<u64>,
}

impl RowRecord {
    /// Flatten a row for the given schema
    #[must_use]
    pub fn from_row(row: &Row, schema: TableSchema) -> Self {
        let tokens = match schema {
            TableSchema::Basic => None,
            TableSchema::WithTokens => Some(row.tokens.unwrap_or_default()),
        };
        Self {
            row_number: row.row_number,
            original_text: row.original_text.clone(),
            processed_text: row.outcome.processed_text().map(str::to_string),
            error: row.outcome.error().map(str::to_string),
            original_token_count: tokens.map(|t| t.original),
            processed_token_count: tokens.map(|t| t.processed),
        }
    }

    /// Cells in column order for `schema`; absent values become empty cells
    #[must_use]
    pub fn csv_fields(&self, schema: TableSchema) -> Vec<String> {
        let mut fields = vec![
            self.row_number.to_string(),
            self.original_text.clone(),
            self.processed_text.clone().unwrap_or_default(),
            self.error.clone().unwrap_or_default(),
        ];
        if schema == TableSchema::WithTokens {
            fields.push(self.original_token_count.unwrap_or(0).to_string());
            fields.push(self.processed_token_count.unwrap_or(0).to_string());
        }
        fields
    }
}

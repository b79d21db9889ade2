//! Plain-text result log.
//!
//! One section per row, opened by a delimiter line and closed by a line of
//! fifty dashes:
//!
//! ```text
//! === Row 1 ===
//! Original text: Hello
//! Processed text:
//! Hi! How can I help?
//!
//! --------------------------------------------------
//!
//! ```
//!
//! [`render`] writes this format and [`parse`] reads it back.

mod parse;
mod render;

pub use parse::{parse, LogTable};
pub use render::render;

use serde::{Deserialize, Serialize};

/// Width of the separator line closing every section.
pub const SEPARATOR_WIDTH: usize = 50;

/// The separator line itself.
#[must_use]
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Label words used in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLabels {
    /// Word inside the delimiter, `=== <row> N ===`
    pub row: &'static str,
    /// Prefix of the original text line
    pub original_text: &'static str,
    /// Line introducing the processed text block
    pub processed_text: &'static str,
    /// Prefix of the error line
    pub error: &'static str,
    /// Prefix of the original token count line
    pub original_tokens: &'static str,
    /// Prefix of the processed token count line
    pub processed_tokens: &'static str,
}

impl LogLabels {
    /// English labels (default).
    pub const ENGLISH: Self = Self {
        row: "Row",
        original_text: "Original text:",
        processed_text: "Processed text:",
        error: "Error:",
        original_tokens: "Original tokens:",
        processed_tokens: "Processed tokens:",
    };

    /// Spanish labels, for logs from the older Spanish-language tooling.
    pub const SPANISH: Self = Self {
        row: "Fila",
        original_text: "Texto original:",
        processed_text: "Texto procesado:",
        error: "Error:",
        original_tokens: "Tokens originales:",
        processed_tokens: "Tokens procesados:",
    };
}

impl Default for LogLabels {
    fn default() -> Self {
        Self::ENGLISH
    }
}

/// Named label presets, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSet {
    /// [`LogLabels::ENGLISH`]
    #[default]
    English,
    /// [`LogLabels::SPANISH`]
    Spanish,
}

impl LabelSet {
    /// Labels of this preset
    #[must_use]
    pub const fn labels(self) -> LogLabels {
        match self {
            Self::English => LogLabels::ENGLISH,
            Self::Spanish => LogLabels::SPANISH,
        }
    }
}

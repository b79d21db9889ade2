use super::{separator, LogLabels};
use crate::row::{Row, RowOutcome, TableSchema};
use std::fmt::Write;

/// Line breaks inside single-line fields would end the field early.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Render rows in the text log format.
#[must_use]
pub fn render(rows: &[Row], schema: TableSchema, labels: &LogLabels) -> String {
    let with_tokens = schema == TableSchema::WithTokens;
    let sep = separator();
    let mut out = String::new();

    for row in rows {
        let tokens = row.tokens.unwrap_or_default();
        let _ = writeln!(out, "=== {} {} ===", labels.row, row.row_number);
        let _ = writeln!(
            out,
            "{} {}",
            labels.original_text,
            single_line(&row.original_text)
        );
        if with_tokens {
            let _ = writeln!(out, "{} {}", labels.original_tokens, tokens.original);
        }
        match &row.outcome {
            RowOutcome::Failed { error } => {
                let _ = writeln!(out, "{} {}", labels.error, single_line(error));
            }
            RowOutcome::Processed { text } => {
                let _ = writeln!(out, "{}\n{text}", labels.processed_text);
                if with_tokens {
                    let _ = writeln!(out, "{} {}", labels.processed_tokens, tokens.processed);
                }
            }
        }
        let _ = write!(out, "\n{sep}\n\n");
    }
    out
}

use super::{separator, LogLabels};
use crate::result::PromptbenchResult;
use crate::row::{Row, RowOutcome, TableSchema, TokenCounts};
use regex::Regex;

/// Rows recovered from a text log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogTable {
    /// Rows in delimiter order
    pub rows: Vec<Row>,
    /// `WithTokens` when any section carried a token line
    pub schema: TableSchema,
}

struct Patterns {
    delimiter: Regex,
    original_text: Regex,
    original_tokens: Regex,
    processed_label: Regex,
    processed_tokens: Regex,
    error: Regex,
}

impl Patterns {
    fn new(labels: &LogLabels) -> Result<Self, regex::Error> {
        let line = |label: &str, value: &str| {
            Regex::new(&format!(r"(?m)^{} {value}$", regex::escape(label)))
        };
        Ok(Self {
            delimiter: Regex::new(&format!(
                r"(?m)^=== {} (\d+) ===\n",
                regex::escape(labels.row)
            ))?,
            original_text: line(labels.original_text, "(.*)")?,
            original_tokens: line(labels.original_tokens, r"(\d+)")?,
            processed_label: Regex::new(&format!(
                r"(?m)^{}\n",
                regex::escape(labels.processed_text)
            ))?,
            processed_tokens: line(labels.processed_tokens, r"(\d+)")?,
            error: line(labels.error, "(.*)")?,
        })
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn capture_count(re: &Regex, text: &str) -> Option<u64> {
    capture(re, text).and_then(|n| n.parse().ok())
}

/// Parse a text log back into rows.
///
/// Text before the first delimiter is ignored. A section with neither an
/// error line nor a processed-text block yields empty processed text.
pub fn parse(content: &str, labels: &LogLabels) -> PromptbenchResult<LogTable> {
    let content = content.replace("\r\n", "\n");
    let patterns = Patterns::new(labels)?;

    let delimiters: Vec<(usize, usize, &str)> = patterns
        .delimiter
        .captures_iter(&content)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some((whole.start(), whole.end(), c.get(1)?.as_str()))
        })
        .collect();

    let mut rows = Vec::with_capacity(delimiters.len());
    let mut has_tokens = false;

    for (i, &(_, body_start, number)) in delimiters.iter().enumerate() {
        let body_end = delimiters
            .get(i + 1)
            .map_or(content.len(), |&(next_start, _, _)| next_start);
        let Ok(row_number) = number.parse::<usize>() else {
            tracing::warn!(number, "row number out of range, skipping section");
            continue;
        };
        let (row, tokens_seen) = parse_section(&content[body_start..body_end], row_number, &patterns);
        has_tokens |= tokens_seen;
        rows.push(row);
    }

    let schema = if has_tokens {
        TableSchema::WithTokens
    } else {
        TableSchema::Basic
    };
    Ok(LogTable { rows, schema })
}

fn parse_section(section: &str, row_number: usize, patterns: &Patterns) -> (Row, bool) {
    let processed_at = patterns.processed_label.find(section);
    // Header lines precede the processed block; an "Error:" line inside
    // the model's answer is not a row error.
    let header = processed_at.map_or(section, |m| &section[..m.start()]);

    let original_text = capture(&patterns.original_text, header).unwrap_or_default();
    let original_tokens = capture_count(&patterns.original_tokens, header);
    let mut processed_tokens = None;

    let outcome = if let Some(error) = capture(&patterns.error, header) {
        RowOutcome::failed(error)
    } else if let Some(label) = processed_at {
        let block = &section[label.end()..];
        let block = block
            .find(&format!("\n{}", separator()))
            .map_or(block, |end| &block[..end]);
        let mut text = block.trim();
        // The processed-tokens line is only written after an original-tokens
        // header; without one a trailing token-like line is part of the answer.
        if original_tokens.is_some() {
            if let Some((body, last)) = text.rsplit_once('\n') {
                if let Some(n) = capture_count(&patterns.processed_tokens, last) {
                    processed_tokens = Some(n);
                    text = body.trim_end();
                }
            } else if let Some(n) = capture_count(&patterns.processed_tokens, text) {
                processed_tokens = Some(n);
                text = "";
            }
        }
        RowOutcome::processed(text)
    } else {
        tracing::warn!(row_number, "section has neither error nor processed text");
        RowOutcome::processed("")
    };

    let tokens_seen = original_tokens.is_some() || processed_tokens.is_some();
    let mut row = Row::new(row_number, original_text, outcome);
    if tokens_seen {
        row = row.with_tokens(TokenCounts {
            original: original_tokens.unwrap_or(0),
            processed: processed_tokens.unwrap_or(0),
        });
    }
    (row, tokens_seen)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sep() -> String {
        "-".repeat(50)
    }

    #[test]
    fn test_two_sections_error_and_multiline() {
        let log = format!(
            "=== Row 1 ===\nOriginal text: first prompt\nError: HTTP error: connection refused\n\n{s}\n\n\
             === Row 2 ===\nOriginal text: second prompt\nProcessed text:\n  Line one\n\n  - bullet\nLine three  \n\n{s}\n\n",
            s = sep()
        );
        let table = parse(&log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.schema, TableSchema::Basic);
        assert_eq!(table.rows.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.row_number, 1);
        assert_eq!(first.original_text, "first prompt");
        assert_eq!(first.outcome.error(), Some("HTTP error: connection refused"));
        assert_eq!(first.outcome.processed_text(), None);

        let second = &table.rows[1];
        assert_eq!(second.row_number, 2);
        assert_eq!(
            second.outcome.processed_text(),
            Some("Line one\n\n  - bullet\nLine three")
        );
    }

    #[test]
    fn test_no_delimiters_yields_empty_table() {
        let table = parse("just some text\nwithout sections\n", &LogLabels::ENGLISH).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.schema, TableSchema::Basic);
    }

    #[test]
    fn test_preamble_is_ignored() {
        let log = format!("preamble\n=== Row 7 ===\nOriginal text: x\nProcessed text:\ny\n\n{}\n\n", sep());
        let table = parse(&log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].row_number, 7);
    }

    #[test]
    fn test_malformed_section_gives_empty_processed_text() {
        let log = "=== Row 1 ===\nOriginal text: orphan\nsomething else\n=== Row 2 ===\n";
        let table = parse(log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].original_text, "orphan");
        assert_eq!(table.rows[0].outcome.processed_text(), Some(""));
        assert_eq!(table.rows[1].original_text, "");
        assert_eq!(table.rows[1].outcome.processed_text(), Some(""));
    }

    #[test]
    fn test_processed_text_runs_to_end_without_separator() {
        let log = "=== Row 1 ===\nOriginal text: q\nProcessed text:\nanswer\nmore\n";
        let table = parse(log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.rows[0].outcome.processed_text(), Some("answer\nmore"));
    }

    #[test]
    fn test_error_word_inside_answer_is_not_an_error() {
        let log = format!(
            "=== Row 1 ===\nOriginal text: explain\nProcessed text:\nError: is a word.\n\n{}\n\n",
            sep()
        );
        let table = parse(&log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.rows[0].outcome.processed_text(), Some("Error: is a word."));
    }

    #[test]
    fn test_crlf_log() {
        let log = format!(
            "=== Row 1 ===\r\nOriginal text: q\r\nProcessed text:\r\na\r\nb\r\n\r\n{}\r\n",
            sep()
        );
        let table = parse(&log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.rows[0].original_text, "q");
        assert_eq!(table.rows[0].outcome.processed_text(), Some("a\nb"));
    }

    #[test]
    fn test_token_lines() {
        let log = format!(
            "=== Fila 1 ===\nTexto original: hola\nTokens originales: 2\nTexto procesado:\nque tal\nTokens procesados: 4\n\n{}\n\n",
            sep()
        );
        let table = parse(&log, &LogLabels::SPANISH).unwrap();
        assert_eq!(table.schema, TableSchema::WithTokens);
        let row = &table.rows[0];
        assert_eq!(row.outcome.processed_text(), Some("que tal"));
        assert_eq!(
            row.tokens,
            Some(TokenCounts {
                original: 2,
                processed: 4
            })
        );
    }

    #[test]
    fn test_token_like_last_line_without_header_stays_in_answer() {
        let log = format!(
            "=== Row 1 ===\nOriginal text: q\nProcessed text:\nSummary\nProcessed tokens: 5\n\n{}\n\n",
            sep()
        );
        let table = parse(&log, &LogLabels::ENGLISH).unwrap();
        assert_eq!(table.schema, TableSchema::Basic);
        let row = &table.rows[0];
        assert_eq!(
            row.outcome.processed_text(),
            Some("Summary\nProcessed tokens: 5")
        );
        assert_eq!(row.tokens, None);
    }

    #[test]
    fn test_other_label_set_finds_nothing() {
        let log = "=== Row 1 ===\nOriginal text: q\nProcessed text:\na\n";
        assert!(parse(log, &LogLabels::SPANISH).unwrap().rows.is_empty());
    }
}

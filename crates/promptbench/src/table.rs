//! Reading input tables and writing result tables.
//!
//! Inputs are header-driven CSV files: columns are looked up by name, so
//! their order does not matter. Outputs are picked by file extension
//! (see [`OutputFormat::from_path`]) and written in one go.

use crate::result::{PromptbenchError, PromptbenchResult};
use crate::row::{Row, RowOutcome, RowRecord, TableSchema};
use crate::textlog::{self, LogLabels, LogTable};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Column holding the prompt in runner input files.
pub const PROMPT_COLUMN: &str = "prompt_text";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain-text log with `=== Row N ===` sections
    #[default]
    Text,
    /// Indented JSON array of row objects
    Json,
    /// CSV with a header row
    Csv,
}

impl OutputFormat {
    /// `.json` and `.csv` (any case) select those formats, anything else
    /// is a text log.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

fn input_error(path: &Path, err: io::Error) -> PromptbenchError {
    match err.kind() {
        io::ErrorKind::NotFound => PromptbenchError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => PromptbenchError::Io(err),
    }
}

fn open_input(path: &Path) -> PromptbenchResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| input_error(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

fn column_index(headers: &csv::StringRecord, column: &str) -> PromptbenchResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| PromptbenchError::missing_column(column))
}

/// Read the `prompt_text` column of a runner input file.
///
/// Every data row yields one entry, blank prompts included, so entry `i`
/// is row number `i + 1`.
pub fn read_prompts(path: &Path) -> PromptbenchResult<Vec<String>> {
    let mut reader = open_input(path)?;
    let idx = column_index(reader.headers()?, PROMPT_COLUMN)?;

    let mut prompts = Vec::new();
    for record in reader.records() {
        let record = record?;
        prompts.push(record.get(idx).unwrap_or_default().to_string());
    }
    tracing::debug!(path = %path.display(), rows = prompts.len(), "read prompts");
    Ok(prompts)
}

/// Read a result table (as written by a runner) for token annotation.
///
/// Needs `original_text`, `processed_text` and `error`; `row_number` is
/// used when present and numeric, else the 1-based position. A non-blank
/// `error` makes the row failed. Token columns are ignored.
pub fn read_result_table(path: &Path) -> PromptbenchResult<Vec<Row>> {
    let mut reader = open_input(path)?;
    let headers = reader.headers()?.clone();
    let original_idx = column_index(&headers, "original_text")?;
    let processed_idx = column_index(&headers, "processed_text")?;
    let error_idx = column_index(&headers, "error")?;
    let number_idx = column_index(&headers, "row_number").ok();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let row_number = number_idx
            .and_then(|idx| field(idx).trim().parse().ok())
            .unwrap_or(i + 1);
        let error = field(error_idx);
        let outcome = if error.trim().is_empty() {
            RowOutcome::processed(field(processed_idx))
        } else {
            RowOutcome::failed(error)
        };
        rows.push(Row::new(row_number, field(original_idx), outcome));
    }
    Ok(rows)
}

/// Read and parse a text log.
pub fn read_log(path: &Path, labels: &LogLabels) -> PromptbenchResult<LogTable> {
    let content = std::fs::read_to_string(path).map_err(|e| input_error(path, e))?;
    let table = textlog::parse(&content, labels)?;
    tracing::debug!(path = %path.display(), rows = table.rows.len(), "parsed log");
    Ok(table)
}

/// Write rows as CSV; an empty table still gets its header.
pub fn write_csv<W: Write>(writer: W, rows: &[Row], schema: TableSchema) -> PromptbenchResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(schema.columns())?;
    for row in rows {
        csv_writer.write_record(RowRecord::from_row(row, schema).csv_fields(schema))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Rows as a pretty-printed JSON array.
pub fn to_json(rows: &[Row], schema: TableSchema) -> PromptbenchResult<String> {
    let records: Vec<RowRecord> = rows
        .iter()
        .map(|row| RowRecord::from_row(row, schema))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write the whole table to `path` in the format its extension selects.
pub fn write_table(
    path: &Path,
    rows: &[Row],
    schema: TableSchema,
    labels: &LogLabels,
) -> PromptbenchResult<OutputFormat> {
    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Json => std::fs::write(path, to_json(rows, schema)?)?,
        OutputFormat::Csv => write_csv(File::create(path)?, rows, schema)?,
        OutputFormat::Text => std::fs::write(path, textlog::render(rows, schema, labels))?,
    }
    tracing::info!(path = %path.display(), rows = rows.len(), ?format, "wrote results");
    Ok(format)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::row::{TokenCounts, NO_CONTENT};
    use std::path::PathBuf;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::new(1, "Hello", RowOutcome::processed("Hello")),
            Row::new(2, "", RowOutcome::processed(NO_CONTENT)),
            Row::new(3, "fail-trigger", RowOutcome::failed("mock failure")),
        ]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out.txt")), OutputFormat::Text);
        assert_eq!(OutputFormat::from_path(Path::new("results")), OutputFormat::Text);
    }

    #[test]
    fn test_read_prompts_counts_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "id,prompt_text\n1,Hello\n2,\n3,\"multi\nline\"\n").unwrap();
        let prompts = read_prompts(&path).unwrap();
        assert_eq!(prompts, vec!["Hello", "", "multi\nline"]);
    }

    #[test]
    fn test_read_prompts_short_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "id,prompt_text\n1,Hi\n2\n").unwrap();
        assert_eq!(read_prompts(&path).unwrap(), vec!["Hi", ""]);
    }

    #[test]
    fn test_read_prompts_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "id,text\n1,Hello\n").unwrap();
        let err = read_prompts(&path).unwrap_err();
        assert!(matches!(err, PromptbenchError::MissingColumn { ref column } if column == "prompt_text"));
    }

    #[test]
    fn test_read_prompts_missing_file() {
        let err = read_prompts(&PathBuf::from("/nonexistent/prompts.csv")).unwrap_err();
        assert!(matches!(err, PromptbenchError::InputNotFound { .. }));
    }

    #[test]
    fn test_read_result_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(
            &path,
            "error,processed_text,original_text,row_number\n,Hi,Hello,1\nboom,,bad,5\n,,empty,x\n",
        )
        .unwrap();
        let rows = read_result_table(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Row::new(1, "Hello", RowOutcome::processed("Hi")));
        assert_eq!(rows[1], Row::new(5, "bad", RowOutcome::failed("boom")));
        assert_eq!(rows[2], Row::new(3, "empty", RowOutcome::processed("")));
    }

    #[test]
    fn test_read_result_table_requires_error_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "row_number,original_text,processed_text\n1,a,b\n").unwrap();
        let err = read_result_table(&path).unwrap_err();
        assert!(err.to_string().contains("'error'"));
    }

    #[test]
    fn test_log_to_csv_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("output.txt");
        let csv_path = dir.path().join("output.csv");
        let sep = "-".repeat(50);
        std::fs::write(
            &log_path,
            format!(
                "=== Row 1 ===\nOriginal text: first\nError: timeout\n\n{sep}\n\n\
                 === Row 2 ===\nOriginal text: second\nProcessed text:\nLine A\n\nLine B\n\n{sep}\n\n"
            ),
        )
        .unwrap();

        let table = read_log(&log_path, &LogLabels::ENGLISH).unwrap();
        write_table(&csv_path, &table.rows, table.schema, &LogLabels::ENGLISH).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ["row_number", "original_text", "processed_text", "error"]);
        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ["1", "first", "", "timeout"]);
        assert_eq!(records[1], ["2", "second", "Line A\n\nLine B", ""]);
    }

    #[test]
    fn test_read_log_missing_file() {
        let err = read_log(Path::new("/nonexistent/output.txt"), &LogLabels::ENGLISH).unwrap_err();
        assert!(matches!(err, PromptbenchError::InputNotFound { .. }));
    }

    #[test]
    fn test_write_csv_basic() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_rows(), TableSchema::Basic).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "row_number,original_text,processed_text,error\n\
             1,Hello,Hello,\n\
             2,,No content,\n\
             3,fail-trigger,,mock failure\n"
        );
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[], TableSchema::WithTokens).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "row_number,original_text,processed_text,error,original_token_count,processed_token_count\n"
        );
    }

    #[test]
    fn test_json_keeps_non_ascii_and_nulls() {
        let rows = vec![
            Row::new(1, "¿Qué?", RowOutcome::processed("Sí")).with_tokens(TokenCounts {
                original: 3,
                processed: 1,
            }),
            Row::new(2, "x", RowOutcome::failed("boom")),
        ];
        let json = to_json(&rows, TableSchema::WithTokens).unwrap();
        assert!(json.contains("\"original_text\": \"¿Qué?\""));
        assert!(json.contains("\"processed_text\": null"));
        assert!(json.contains("\"processed_token_count\": 0"));
        let parsed: Vec<RowRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].original_token_count, Some(3));
    }

    #[test]
    fn test_write_table_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let rows = sample_rows();
        for (name, expected) in [
            ("out.csv", OutputFormat::Csv),
            ("out.json", OutputFormat::Json),
            ("out.txt", OutputFormat::Text),
        ] {
            let path = dir.path().join(name);
            let format = write_table(&path, &rows, TableSchema::Basic, &LogLabels::ENGLISH).unwrap();
            assert_eq!(format, expected);
            assert!(path.exists());
        }
        let log = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert!(log.starts_with("=== Row 1 ===\n"));
    }
}

//! Row processor: turns prompts into result rows, one backend call at a time.
//!
//! Rows are processed strictly in input order. A failed backend call is
//! recorded on its row and the batch continues; only setup problems (bad
//! template, unreadable input) abort a run, and those happen before the
//! processor is built.

use crate::backend::{count_or_zero, BackendError, TextGenerator, TokenCounter};
use crate::row::{truncate_for_display, Row, RowOutcome, TokenCounts, NO_CONTENT};
use crate::template::PromptTemplate;
use std::fmt;

/// Observer for batch progress.
///
/// Every method has an empty default, so implementors pick what they need.
pub trait BatchProgress {
    /// Called once before the first row.
    fn batch_started(&self, _total: usize) {}

    /// Called before each row, blank ones included.
    fn row_started(&self, _row_number: usize, _total: usize) {}

    /// Called after each row with its final state.
    fn row_finished(&self, _row: &Row) {}

    /// Called once after the last row.
    fn batch_finished(&self, _rows: &[Row]) {}
}

/// Progress observer that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl BatchProgress for SilentProgress {}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows written
    pub total: usize,
    /// Rows whose backend call failed
    pub failed: usize,
    /// Blank prompts answered with the placeholder
    pub blank: usize,
}

impl BatchSummary {
    /// Count outcomes in `rows`.
    #[must_use]
    pub fn of(rows: &[Row]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total += 1;
            match &row.outcome {
                RowOutcome::Failed { .. } => acc.failed += 1,
                RowOutcome::Processed { text } if text == NO_CONTENT && row.original_text.is_empty() => {
                    acc.blank += 1;
                }
                RowOutcome::Processed { .. } => {}
            }
            acc
        })
    }

    /// Rows that got a response
    #[must_use]
    pub const fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}

/// Sends prompts through a template and a generator.
///
/// With a token counter attached (inline counting), every row carries
/// token counts: the trimmed prompt and the response are counted after
/// generation, and a counting failure fails the row.
pub struct RowProcessor<'a> {
    generator: &'a dyn TextGenerator,
    template: PromptTemplate,
    counter: Option<&'a dyn TokenCounter>,
}

impl fmt::Debug for RowProcessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowProcessor")
            .field("generator", &self.generator.name())
            .field("template", &self.template)
            .field("inline_counting", &self.counter.is_some())
            .finish()
    }
}

impl<'a> RowProcessor<'a> {
    /// Processor without token counting
    #[must_use]
    pub fn new(generator: &'a dyn TextGenerator, template: PromptTemplate) -> Self {
        Self {
            generator,
            template,
            counter: None,
        }
    }

    /// Enable inline token counting
    #[must_use]
    pub fn with_counter(mut self, counter: &'a dyn TokenCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Whether rows get token counts
    #[must_use]
    pub const fn counts_tokens(&self) -> bool {
        self.counter.is_some()
    }

    /// Process a single prompt into row `row_number`.
    pub async fn process_row(&self, row_number: usize, prompt: &str) -> Row {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::debug!(row_number, "blank prompt, no backend call");
            return self.finish(Row::new(row_number, "", RowOutcome::processed(NO_CONTENT)), None);
        }

        let original_text = truncate_for_display(prompt);
        match self.call(prompt).await {
            Ok((text, tokens)) => {
                self.finish(Row::new(row_number, original_text, RowOutcome::processed(text)), tokens)
            }
            Err(e) => {
                tracing::warn!(
                    row_number,
                    backend = self.generator.name(),
                    kind = e.kind(),
                    error = %e,
                    "row failed"
                );
                self.finish(Row::new(row_number, original_text, RowOutcome::failed(e.to_string())), None)
            }
        }
    }

    /// Process every prompt in order; row numbers start at 1.
    pub async fn process_all<P>(&self, prompts: &[String], progress: &P) -> Vec<Row>
    where
        P: BatchProgress + ?Sized,
    {
        let total = prompts.len();
        tracing::info!(
            backend = self.generator.name(),
            total,
            inline_counting = self.counts_tokens(),
            "batch started"
        );
        progress.batch_started(total);

        let mut rows = Vec::with_capacity(total);
        for (i, prompt) in prompts.iter().enumerate() {
            let row_number = i + 1;
            progress.row_started(row_number, total);
            let row = self.process_row(row_number, prompt).await;
            progress.row_finished(&row);
            rows.push(row);
        }

        let summary = BatchSummary::of(&rows);
        tracing::info!(
            total = summary.total,
            failed = summary.failed,
            blank = summary.blank,
            "batch finished"
        );
        progress.batch_finished(&rows);
        rows
    }

    async fn call(&self, prompt: &str) -> Result<(String, Option<TokenCounts>), BackendError> {
        let rendered = self.template.render(prompt);
        tracing::debug!(backend = self.generator.name(), chars = rendered.len(), "generate");
        let text = self.generator.generate(&rendered).await?;

        let tokens = match self.counter {
            Some(counter) => Some(TokenCounts {
                original: count_or_zero(counter, prompt).await?,
                processed: count_or_zero(counter, &text).await?,
            }),
            None => None,
        };
        Ok((text, tokens))
    }

    /// Attach counts in inline mode; rows without counts get zeros.
    fn finish(&self, row: Row, tokens: Option<TokenCounts>) -> Row {
        if self.counts_tokens() {
            row.with_tokens(tokens.unwrap_or_default())
        } else {
            row
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::row::{TableSchema, ORIGINAL_TEXT_LIMIT};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes prompts back, fails on `fail-trigger`, counts words.
    #[derive(Debug, Default)]
    pub(crate) struct MockBackend {
        pub generate_calls: AtomicUsize,
        pub count_calls: AtomicUsize,
        pub seen: Mutex<Vec<String>>,
        pub fail_counting: bool,
    }

    #[async_trait]
    impl TextGenerator for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(prompt.to_string());
            if prompt.contains("fail-trigger") {
                return Err(BackendError::Reported("mock failure".to_string()));
            }
            Ok(prompt.to_string())
        }
    }

    #[async_trait]
    impl TokenCounter for MockBackend {
        async fn count_tokens(&self, text: &str) -> Result<u64, BackendError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_counting {
                return Err(BackendError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(text.split_whitespace().count() as u64)
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl BatchProgress for RecordingProgress {
        fn batch_started(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }
        fn row_started(&self, row_number: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("row {row_number}/{total}"));
        }
        fn batch_finished(&self, rows: &[Row]) {
            self.events.lock().unwrap().push(format!("done {}", rows.len()));
        }
    }

    fn prompts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_hello_blank_and_failure() {
        let backend = MockBackend::default();
        let processor = RowProcessor::new(&backend, PromptTemplate::default());
        let rows = processor
            .process_all(&prompts(&["Hello", "", "fail-trigger"]), &SilentProgress)
            .await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Row::new(1, "Hello", RowOutcome::processed("Hello")));
        assert_eq!(rows[1], Row::new(2, "", RowOutcome::processed(NO_CONTENT)));
        assert_eq!(rows[2].row_number, 3);
        assert_eq!(rows[2].original_text, "fail-trigger");
        assert!(rows[2].outcome.is_failed());
        assert!(rows[2].outcome.error().unwrap().contains("mock failure"));
        assert_eq!(TableSchema::infer(&rows), TableSchema::Basic);

        // blank prompt never reaches the backend
        assert_eq!(backend.generate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_template_applied_and_prompt_trimmed() {
        let backend = MockBackend::default();
        let template = PromptTemplate::parse("Summarize: {prompt_text}").unwrap();
        let processor = RowProcessor::new(&backend, template);
        let row = processor.process_row(1, "  some text \n").await;

        assert_eq!(row.original_text, "some text");
        assert_eq!(row.outcome.processed_text(), Some("Summarize: some text"));
        assert_eq!(*backend.seen.lock().unwrap(), vec!["Summarize: some text"]);
    }

    #[tokio::test]
    async fn test_long_prompt_display_is_truncated() {
        let backend = MockBackend::default();
        let processor = RowProcessor::new(&backend, PromptTemplate::default());
        let prompt = "x".repeat(ORIGINAL_TEXT_LIMIT + 20);
        let row = processor.process_row(1, &prompt).await;

        assert_eq!(row.original_text.chars().count(), ORIGINAL_TEXT_LIMIT + 3);
        assert!(row.original_text.ends_with("..."));
        // backend still gets the whole prompt
        assert_eq!(row.outcome.processed_text(), Some(prompt.as_str()));
    }

    #[tokio::test]
    async fn test_inline_counting() {
        let backend = MockBackend::default();
        let template = PromptTemplate::parse("Echo {prompt_text}").unwrap();
        let processor = RowProcessor::new(&backend, template).with_counter(&backend);
        let rows = processor
            .process_all(&prompts(&["one two", "  ", "fail-trigger"]), &SilentProgress)
            .await;

        // prompt is counted without the template, response with it
        assert_eq!(
            rows[0].tokens,
            Some(TokenCounts {
                original: 2,
                processed: 3
            })
        );
        assert_eq!(rows[1].tokens, Some(TokenCounts::default()));
        assert_eq!(rows[2].tokens, Some(TokenCounts::default()));
        assert_eq!(TableSchema::infer(&rows), TableSchema::WithTokens);
        assert_eq!(backend.count_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_counting_failure_fails_row() {
        let backend = MockBackend {
            fail_counting: true,
            ..MockBackend::default()
        };
        let processor = RowProcessor::new(&backend, PromptTemplate::default()).with_counter(&backend);
        let row = processor.process_row(4, "Hello").await;

        assert_eq!(row.outcome.error(), Some("API error 503: unavailable"));
        assert_eq!(row.tokens, Some(TokenCounts::default()));
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let backend = MockBackend::default();
        let processor = RowProcessor::new(&backend, PromptTemplate::default());
        let progress = RecordingProgress::default();
        processor.process_all(&prompts(&["a", ""]), &progress).await;

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start 2", "row 1/2", "row 2/2", "done 2"]
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let backend = MockBackend::default();
        let processor = RowProcessor::new(&backend, PromptTemplate::default());
        let rows = processor.process_all(&[], &SilentProgress).await;
        assert!(rows.is_empty());
        assert_eq!(BatchSummary::of(&rows), BatchSummary::default());
    }

    #[test]
    fn test_batch_summary() {
        let rows = vec![
            Row::new(1, "Hello", RowOutcome::processed("Hi")),
            Row::new(2, "", RowOutcome::processed(NO_CONTENT)),
            Row::new(3, "x", RowOutcome::failed("boom")),
        ];
        let summary = BatchSummary::of(&rows);
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                failed: 1,
                blank: 1
            }
        );
        assert_eq!(summary.succeeded(), 2);
    }
}

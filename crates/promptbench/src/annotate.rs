//! Token annotator: adds token counts to an existing result table.

use crate::backend::{count_or_zero, TokenCounter};
use crate::processor::BatchProgress;
use crate::row::{Row, RowOutcome, TokenCounts};

/// Adds `original_token_count` and `processed_token_count` to rows.
///
/// Unlike inline counting in [`crate::processor::RowProcessor`], a failed
/// count never fails the row: it is logged and recorded as 0.
pub struct TokenAnnotator<'a> {
    counter: &'a dyn TokenCounter,
}

impl std::fmt::Debug for TokenAnnotator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAnnotator").finish_non_exhaustive()
    }
}

impl<'a> TokenAnnotator<'a> {
    /// Create an annotator that counts with `counter`.
    #[must_use]
    pub fn new(counter: &'a dyn TokenCounter) -> Self {
        Self { counter }
    }

    /// Count tokens for one row.
    ///
    /// The processed text is only counted when the row did not fail.
    pub async fn annotate_row(&self, row: Row) -> Row {
        let original = self.count(row.row_number, "original", &row.original_text).await;
        let processed = match &row.outcome {
            RowOutcome::Processed { text } => self.count(row.row_number, "processed", text).await,
            RowOutcome::Failed { .. } => 0,
        };
        row.with_tokens(TokenCounts {
            original,
            processed,
        })
    }

    /// Annotate every row in order.
    pub async fn annotate_all<P>(&self, rows: Vec<Row>, progress: &P) -> Vec<Row>
    where
        P: BatchProgress + ?Sized,
    {
        let total = rows.len();
        tracing::info!(total, "token annotation started");
        progress.batch_started(total);

        let mut annotated = Vec::with_capacity(total);
        for (i, row) in rows.into_iter().enumerate() {
            progress.row_started(i + 1, total);
            let row = self.annotate_row(row).await;
            progress.row_finished(&row);
            annotated.push(row);
        }

        progress.batch_finished(&annotated);
        annotated
    }

    async fn count(&self, row_number: usize, field: &'static str, text: &str) -> u64 {
        match count_or_zero(self.counter, text).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(row_number, field, kind = e.kind(), error = %e, "token count failed, using 0");
                0
            }
        }
    }
}

//! Status output and per-row progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use promptbench::{BatchProgress, BatchSummary, Row};
use std::path::Path;
use std::time::Duration;

/// Progress reporter for batch runs.
///
/// Per-row lines (`Processing row i/total...`) go to stdout; status
/// messages and the progress bar go to stderr. The bar is only drawn when
/// stderr is a terminal.
#[derive(Debug)]
pub struct ProgressReporter {
    out: Term,
    term: Term,
    progress_bar: ProgressBar,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Rows carry results from an earlier run; their errors are not ours
    annotating: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        let target = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self {
            out: Term::stdout(),
            term: Term::stderr(),
            progress_bar: ProgressBar::with_draw_target(None, target),
            use_color,
            quiet,
            annotating: false,
        }
    }

    /// Report a token-annotation pass instead of a prompt run.
    ///
    /// Failed and blank input rows are annotated like any other, so no
    /// per-row failure or skip lines are printed.
    #[must_use]
    pub const fn annotating(mut self) -> Self {
        self.annotating = true;
        self
    }

    fn line(&self, term: &Term, text: &str) {
        self.progress_bar.suspend(|| {
            let _ = term.write_line(text);
        });
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };

        self.line(&self.term, &format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.line(&self.term, &format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.line(&self.term, &format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.line(&self.term, &format!("{prefix} {message}"));
    }

    /// Print the end-of-batch summary
    pub fn summary(&self, summary: &BatchSummary, output: &Path, duration: Duration) {
        if self.annotating {
            self.success(&format!(
                "{} rows annotated in {:.2}s",
                summary.total,
                duration.as_secs_f64()
            ));
            self.saved_to(output);
            return;
        }
        if self.quiet && summary.failed == 0 {
            return;
        }

        let secs = duration.as_secs_f64();
        let counts = if self.use_color {
            let ok = Style::new().green().bold();
            let failed = Style::new().red().bold();
            format!(
                "{} rows in {secs:.2}s ({} ok, {} failed, {} blank)",
                summary.total,
                ok.apply_to(summary.succeeded()),
                if summary.failed > 0 {
                    failed.apply_to(summary.failed).to_string()
                } else {
                    summary.failed.to_string()
                },
                summary.blank
            )
        } else {
            format!(
                "{} rows in {secs:.2}s ({} ok, {} failed, {} blank)",
                summary.total,
                summary.succeeded(),
                summary.failed,
                summary.blank
            )
        };

        let _ = self.term.write_line("");
        if summary.failed > 0 {
            self.failure(&counts);
        } else {
            self.success(&counts);
        }
        self.saved_to(output);
    }

    fn saved_to(&self, output: &Path) {
        if !self.quiet {
            let _ = self.out.write_line(&format!(
                "Processing complete. Results saved to: {}",
                output.display()
            ));
        }
    }

    /// Status line for a finished row, if any
    fn row_message(&self, row: &Row) -> Option<String> {
        if self.annotating {
            return None;
        }
        if let Some(error) = row.outcome.error() {
            Some(format!("Row {}: {error}", row.row_number))
        } else if row.original_text.is_empty() {
            Some(format!("Row {}: no prompt text, skipped", row.row_number))
        } else {
            None
        }
    }
}

impl BatchProgress for ProgressReporter {
    fn batch_started(&self, total: usize) {
        self.progress_bar.set_length(total as u64);
        self.progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
    }

    fn row_started(&self, row_number: usize, total: usize) {
        if !self.quiet {
            self.line(&self.out, &format!("Processing row {row_number}/{total}..."));
        }
    }

    fn row_finished(&self, row: &Row) {
        if let Some(message) = self.row_message(row) {
            if row.outcome.error().is_some() {
                self.failure(&message);
            } else {
                self.info(&message);
            }
        }
        self.progress_bar.inc(1);
    }

    fn batch_finished(&self, _rows: &[Row]) {
        self.progress_bar.finish_and_clear();
    }
}

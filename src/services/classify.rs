//! Batch review classification service.
//!
//! Classifies reviews one at a time, in input order. Separated from UI
//! concerns - emits events for progress tracking.

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::dataset::{self, DatasetError};
use crate::llm::LlmClient;
use crate::models::{ClassifiedReview, ReviewRecord, Sentiment};

/// Number of characters of review text shown in progress output.
pub const PREVIEW_CHARS: usize = 100;

/// Events emitted during batch classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationEvent {
    /// Batch started
    Started { total_reviews: usize },
    /// Review classification started
    ReviewStarted {
        index: usize,
        product_id: String,
        preview: String,
    },
    /// Review classified (possibly with an error label)
    ReviewCompleted {
        index: usize,
        product_id: String,
        sentiment: Sentiment,
    },
    /// Batch complete
    Complete { classified: usize, errors: usize },
}

/// Result of a full input-to-output run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Classified reviews, in input order.
    pub results: Vec<ClassifiedReview>,
    /// Whether the output file was written.
    pub written: bool,
    /// Output failure, if writing was attempted and failed.
    pub write_error: Option<DatasetError>,
}

impl BatchOutcome {
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.sentiment.is_error()).count()
    }
}

/// Reviews loaded from input, plus the availability check result if one was run.
#[derive(Debug)]
pub struct PreparedBatch {
    /// Validated reviews, in input order.
    pub records: Vec<ReviewRecord>,
    /// `Some(reachable)` when availability was checked, `None` when skipped.
    pub endpoint_available: Option<bool>,
}

/// Service for classifying review batches with an LLM.
pub struct ClassificationService {
    llm_client: LlmClient,
}

impl ClassificationService {
    /// Create a new classification service.
    pub fn new(llm_client: LlmClient) -> Self {
        Self { llm_client }
    }

    /// Read and validate `input`, then optionally check the endpoint.
    ///
    /// The input is loaded first, so a missing file or a bad header fails
    /// without any request reaching the endpoint.
    pub async fn prepare(
        &self,
        input: &Path,
        check_endpoint: bool,
    ) -> Result<PreparedBatch, DatasetError> {
        let records = dataset::read_reviews(input)?;

        let endpoint_available = if check_endpoint {
            Some(self.llm_client.is_available().await)
        } else {
            None
        };

        Ok(PreparedBatch {
            records,
            endpoint_available,
        })
    }

    /// Classify every record, preserving order.
    ///
    /// Per-review failures are recorded as error labels and never stop the
    /// batch. Events are sent with `try_send`: a full or closed channel drops
    /// the event instead of blocking classification.
    pub async fn classify_all(
        &self,
        records: Vec<ReviewRecord>,
        event_tx: mpsc::Sender<ClassificationEvent>,
    ) -> Vec<ClassifiedReview> {
        let total = records.len();
        let _ = event_tx.try_send(ClassificationEvent::Started {
            total_reviews: total,
        });

        let mut results = Vec::with_capacity(total);
        let mut errors = 0;

        for (index, record) in records.into_iter().enumerate() {
            info!(
                "Processing review {}/{} (ProductID: {})",
                index + 1,
                total,
                record.product_id
            );
            let _ = event_tx.try_send(ClassificationEvent::ReviewStarted {
                index,
                product_id: record.product_id.clone(),
                preview: preview(&record.review_text),
            });

            let sentiment = self.llm_client.classify(&record.review_text).await;
            if sentiment.is_error() {
                errors += 1;
            }

            let _ = event_tx.try_send(ClassificationEvent::ReviewCompleted {
                index,
                product_id: record.product_id.clone(),
                sentiment,
            });

            results.push(record.classified(sentiment));
        }

        let _ = event_tx.try_send(ClassificationEvent::Complete {
            classified: results.len(),
            errors,
        });

        results
    }

    /// Classify already loaded reviews and write `output`.
    ///
    /// Output is only written when there is at least one result; a write
    /// failure is returned in the outcome rather than as an error.
    pub async fn classify_and_write(
        &self,
        records: Vec<ReviewRecord>,
        output: &Path,
        event_tx: mpsc::Sender<ClassificationEvent>,
    ) -> BatchOutcome {
        info!(
            "Starting sentiment analysis of {} reviews using model {} (up to {} attempts each)",
            records.len(),
            self.llm_client.config().model,
            self.llm_client.retry_policy().max_attempts()
        );

        let results = self.classify_all(records, event_tx).await;

        if results.is_empty() {
            info!("No results to save");
            return BatchOutcome {
                results,
                written: false,
                write_error: None,
            };
        }

        let (written, write_error) = match dataset::write_results(output, &results) {
            Ok(()) => {
                info!("Results saved to {}", output.display());
                (true, None)
            }
            Err(e) => {
                warn!("{}", e);
                (false, Some(e))
            }
        };

        BatchOutcome {
            results,
            written,
            write_error,
        }
    }

    /// Read reviews from `input`, classify them, and write `output`.
    ///
    /// Input problems abort before any request is made.
    pub async fn run_batch(
        &self,
        input: &Path,
        output: &Path,
        event_tx: mpsc::Sender<ClassificationEvent>,
    ) -> Result<BatchOutcome, DatasetError> {
        let prepared = self.prepare(input, false).await?;
        Ok(self
            .classify_and_write(prepared.records, output, event_tx)
            .await)
    }
}

/// First `PREVIEW_CHARS` characters of a review, with an ellipsis if cut.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(150);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_preview_exact_length() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text), text);
    }
}

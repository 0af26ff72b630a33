//! Sequential batch classification with progress reporting and pacing.

use std::time::{Duration, Instant};

use tracing::Instrument;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::domain::ResultSet;
use crate::error::{FeedbackError, Result};
use crate::obs;

/// Delay inserted between consecutive inference-bound rows.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Receives `(completed, total)` after every classified row.
///
/// Purely observational: it cannot influence the run.
pub trait ProgressSink {
    fn on_progress(&mut self, completed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Progress sink that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Batch run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Fixed courtesy delay between rows; not a backoff.
    pub pacing: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }
}

impl BatchConfig {
    /// Run without any delay between rows.
    pub fn unpaced() -> Self {
        Self {
            pacing: Duration::ZERO,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

/// Classifies reviews one at a time, in input order.
///
/// A failure on any row aborts the whole run; rows classified before the
/// failure are discarded.
pub struct BatchRunner<'a> {
    classifier: &'a Classifier,
    config: BatchConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(classifier: &'a Classifier, config: BatchConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Classify every review and return the results in input order.
    pub async fn run<S, P>(&self, reviews: &[S], progress: &mut P) -> Result<ResultSet>
    where
        S: AsRef<str>,
        P: ProgressSink + ?Sized,
    {
        let batch_id = Uuid::new_v4().to_string();
        let span = obs::batch_span(&batch_id, reviews.len());
        self.run_inner(&batch_id, reviews, progress)
            .instrument(span)
            .await
    }

    async fn run_inner<S, P>(
        &self,
        batch_id: &str,
        reviews: &[S],
        progress: &mut P,
    ) -> Result<ResultSet>
    where
        S: AsRef<str>,
        P: ProgressSink + ?Sized,
    {
        let start = Instant::now();
        let total = reviews.len();
        obs::emit_batch_started(batch_id, total);

        let mut results = Vec::with_capacity(total);
        for (idx, review) in reviews.iter().enumerate() {
            let row = idx + 1;
            let result = match self.classifier.classify(review.as_ref()).await {
                Ok(result) => result,
                Err(err) => {
                    obs::emit_batch_aborted(batch_id, row, &err);
                    return Err(FeedbackError::BatchAborted {
                        row,
                        total,
                        source: Box::new(err),
                    });
                }
            };

            obs::emit_row_classified(row, total, result.sentiment().label());
            results.push(result);
            progress.on_progress(row, total);

            if row < total && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        obs::emit_batch_finished(batch_id, total, start.elapsed().as_millis() as u64);
        Ok(results)
    }
}

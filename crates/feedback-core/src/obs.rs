//! Structured observability hooks for batch lifecycle events.
//!
//! Each batch runs inside a `feedback.batch` span tagged with its
//! `batch_id`; the functions below emit the key lifecycle events at
//! `info!` level (row-level events at `debug!`).

use tracing::{debug, info, warn, Span};

/// Span for a single batch run.
pub fn batch_span(batch_id: &str, total: usize) -> Span {
    tracing::info_span!("feedback.batch", batch_id = %batch_id, total = total)
}

/// Emit event: batch started.
pub fn emit_batch_started(batch_id: &str, total: usize) {
    info!(event = "batch.started", batch_id = %batch_id, total = total);
}

/// Emit event: one row classified.
pub fn emit_row_classified(row: usize, total: usize, sentiment: &str) {
    debug!(event = "batch.row_classified", row = row, total = total, sentiment = %sentiment);
}

/// Emit event: batch finished with every row classified.
pub fn emit_batch_finished(batch_id: &str, total: usize, duration_ms: u64) {
    info!(
        event = "batch.finished",
        batch_id = %batch_id,
        total = total,
        duration_ms = duration_ms,
    );
}

/// Emit event: batch aborted on a failing row (warning level).
pub fn emit_batch_aborted(batch_id: &str, row: usize, error: &dyn std::fmt::Display) {
    warn!(event = "batch.aborted", batch_id = %batch_id, row = row, error = %error);
}

/// Emit event: distribution statistics computed.
pub fn emit_stats_computed(total: usize, negative_total: usize) {
    info!(
        event = "stats.computed",
        total = total,
        negative_total = negative_total,
    );
}

//! Progress-callback trait for per-record batch events.
//!
//! The batch driver knows nothing about terminals; callers inject a
//! [`BatchProgress`] implementation to receive events and render them
//! however they like (the CLI binary forwards them to an indicatif bar).
//! All methods default to no-ops so implementations only override what
//! they care about.

/// Called by the batch driver as it processes each script record.
pub trait BatchProgress {
    /// Called once, with the record count, before any record is processed.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before a record enters the pipeline.
    ///
    /// `index` is 1-based.
    fn on_record_start(&self, index: usize, total: usize, title: &str) {
        let _ = (index, total, title);
    }

    /// Called when a record's EPUB has been written.
    fn on_record_done(&self, index: usize, total: usize, title: &str) {
        let _ = (index, total, title);
    }

    /// Called when a record fails; the batch continues regardless.
    fn on_record_error(&self, index: usize, total: usize, title: &str, error: &str) {
        let _ = (index, total, title, error);
    }

    /// Called once after every record has been attempted.
    fn on_batch_complete(&self, converted: usize, failed: usize) {
        let _ = (converted, failed);
    }
}

/// No-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {}

//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn BulkProgressCallback>`] via
//! [`crate::config::BulkConfigBuilder::progress`] to receive events as the
//! orchestrator works through the source tree.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log, a database record, or a
//! WebSocket — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so a host running
//! several bulk runs (with distinct destination roots) can share one sink.

use crate::output::FileOutcome;
use std::path::Path;
use std::sync::Arc;

/// Called by the orchestrator as it processes each candidate file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The baseline orchestrator is serial, so calls arrive
/// in traversal order on the calling thread.
pub trait BulkProgressCallback: Send + Sync {
    /// Called once after preflight, before any file is converted.
    ///
    /// `total_files` is the preflight file count — an upper bound on the
    /// number of per-file events, since filtering happens later.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is handed to the converter.
    fn on_file_start(&self, path: &Path) {
        let _ = path;
    }

    /// Called once per candidate file with its recorded outcome
    /// (converted, skipped, or failed).
    fn on_file_done(&self, outcome: &FileOutcome) {
        let _ = outcome;
    }

    /// Called once after the last file, before the report is written.
    fn on_run_complete(&self, converted: usize, skipped: usize, failed: usize) {
        let _ = (converted, skipped, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BulkProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BulkConfig`].
pub type ProgressCallback = Arc<dyn BulkProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        dones: AtomicUsize,
        total: AtomicUsize,
    }

    impl BulkProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_files: usize) {
            self.total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _path: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_done(&self, _outcome: &FileOutcome) {
            self.dones.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(5);
        cb.on_file_start(Path::new("a.txt"));
        cb.on_file_done(&FileOutcome::skipped("a.txt".into(), "filtered"));
        cb.on_run_complete(3, 1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = TrackingCallback {
            starts: AtomicUsize::new(0),
            dones: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        };
        t.on_run_start(2);
        t.on_file_start(Path::new("x"));
        t.on_file_done(&FileOutcome::failed("x".into(), "boom"));
        t.on_file_start(Path::new("y"));
        t.on_file_done(&FileOutcome::skipped("y".into(), "exists"));

        assert_eq!(t.total.load(Ordering::SeqCst), 2);
        assert_eq!(t.starts.load(Ordering::SeqCst), 2);
        assert_eq!(t.dones.load(Ordering::SeqCst), 2);
    }
}

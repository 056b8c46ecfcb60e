//! Error types for the mdbulk library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BulkError`] — **Fatal**: the bulk run cannot proceed at all
//!   (bad root directory, preflight limits denied, destination unwritable).
//!   Returned as `Err(BulkError)` from [`crate::convert::bulk_convert`].
//!
//! * [`ConvertError`] — **Non-fatal**: a single file failed (unsupported
//!   format, unreadable input, write glitch) but every other file is fine.
//!   Recorded inside [`crate::output::FileOutcome`] as a reason string so
//!   callers can inspect partial success rather than losing the whole run
//!   to one bad document.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! file failure (`continue_on_error = false`), or collect all errors for the
//! post-run report.

use crate::config::Thresholds;
use crate::output::PreflightStats;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mdbulk library.
///
/// Per-file failures use [`ConvertError`] and are stored in
/// [`crate::output::FileOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BulkError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The root path does not exist or is not a directory.
    #[error("Root path does not exist or is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    // ── Preflight errors ──────────────────────────────────────────────────
    /// The preflight scan exceeded the configured thresholds and no
    /// confirmation was obtained.
    ///
    /// Carries the measured stats and the limits so callers can offer a
    /// retry-with-confirmation path (CLI re-run with `--yes`, HTTP re-submit
    /// with `confirm=true`).
    #[error(
        "Preflight limits exceeded: dirs={}/{}, files={}/{}, bytes={}/{}",
        .stats.directory_count, .thresholds.max_dirs,
        .stats.file_count, .thresholds.max_files,
        .stats.total_bytes, .thresholds.max_bytes
    )]
    PreflightExceeded {
        stats: PreflightStats,
        thresholds: Thresholds,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the destination root (or an ancestor of it).
    #[error("Failed to create destination directory '{path}': {source}")]
    DestinationCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The summary report could not be written into the destination root.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single file.
///
/// Returned by [`crate::converter::DocumentConverter::convert`] and by the
/// per-file write path. The orchestrator flattens it into the outcome's
/// reason string; the run continues unless `continue_on_error` is false.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter has no parser for this file's format.
    #[error("Unsupported format '.{ext}' for '{path}'")]
    UnsupportedFormat { path: PathBuf, ext: String },

    /// The source file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content could not be converted.
    #[error("Malformed document '{path}': {detail}")]
    Malformed { path: PathBuf, detail: String },

    /// The converted Markdown could not be written to its destination.
    #[error("Failed to write output '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn preflight_exceeded_embeds_stats_and_limits() {
        let e = BulkError::PreflightExceeded {
            stats: PreflightStats {
                root: PathBuf::from("/src"),
                directory_count: 20,
                file_count: 500,
                total_bytes: 1024,
            },
            thresholds: Thresholds {
                max_dirs: 16,
                max_files: 128,
                max_bytes: 300 * 1024 * 1024,
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("dirs=20/16"), "got: {msg}");
        assert!(msg.contains("files=500/128"), "got: {msg}");
        assert!(msg.contains("bytes=1024/314572800"), "got: {msg}");
    }

    #[test]
    fn not_a_directory_display() {
        let e = BulkError::NotADirectory {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(e.to_string().contains("/no/such/dir"));
        assert!(e.to_string().contains("not a directory"));
    }

    #[test]
    fn unsupported_format_display() {
        let e = ConvertError::UnsupportedFormat {
            path: PathBuf::from("slides.pptx"),
            ext: "pptx".into(),
        };
        assert!(e.to_string().contains(".pptx"));
        assert!(e.to_string().contains("slides.pptx"));
    }
}

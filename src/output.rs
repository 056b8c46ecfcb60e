//! Result types produced by a bulk conversion run.
//!
//! Everything here is a plain value object: computed once, never mutated
//! afterwards, owned by the single orchestrating call. [`FileOutcome`]
//! constructors enforce the outcome invariant (exactly one of
//! converted-with-destination, skipped-with-reason, failed-with-reason) so
//! the rest of the crate cannot build an inconsistent record.

use serde::Serialize;
use std::path::PathBuf;

/// Read-only estimate of the work in a source tree, computed before any
/// conversion starts.
///
/// Produced by [`crate::walk::preflight`] and compared against
/// [`crate::config::Thresholds`] by the orchestrator. Sizes come from
/// filesystem metadata; a file that disappears between listing and stat is
/// still counted but contributes 0 bytes — this is a best-effort tally, not
/// a guarantee.
#[derive(Debug, Clone, Serialize)]
pub struct PreflightStats {
    /// The scanned root directory.
    pub root: PathBuf,
    /// Directories visited, the root included.
    pub directory_count: usize,
    /// Non-hidden files found.
    pub file_count: usize,
    /// Sum of file sizes in bytes.
    pub total_bytes: u64,
}

/// What happened to a single candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Converted and written to its destination path.
    Converted,
    /// Not converted: filtered out or destination already exists.
    Skipped,
    /// The converter or the output write failed.
    Failed,
}

/// The recorded per-file result of attempting conversion.
///
/// One outcome exists per candidate file, created during the run and never
/// mutated after creation. Exactly one of the following holds:
///
/// * `Converted` — `destination_path`, `word_count`, `heading_count` are set
/// * `Skipped` — `reason` is set (`"filtered"` or `"exists"`)
/// * `Failed` — `reason` carries the error description
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// The source file this outcome describes.
    pub source_path: PathBuf,
    /// Where the Markdown was written. Set iff `status == Converted`.
    pub destination_path: Option<PathBuf>,
    pub status: FileStatus,
    /// Why the file was skipped or failed. Set iff `status != Converted`.
    pub reason: Option<String>,
    /// Whitespace-delimited token count of the Markdown. Set iff converted.
    pub word_count: Option<usize>,
    /// Count of Markdown heading lines. Set iff converted.
    pub heading_count: Option<usize>,
}

impl FileOutcome {
    /// A successfully converted file.
    pub fn converted(
        source_path: PathBuf,
        destination_path: PathBuf,
        word_count: usize,
        heading_count: usize,
    ) -> Self {
        Self {
            source_path,
            destination_path: Some(destination_path),
            status: FileStatus::Converted,
            reason: None,
            word_count: Some(word_count),
            heading_count: Some(heading_count),
        }
    }

    /// A file excluded from conversion (`"filtered"`, `"exists"`, …).
    pub fn skipped(source_path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            source_path,
            destination_path: None,
            status: FileStatus::Skipped,
            reason: Some(reason.into()),
            word_count: None,
            heading_count: None,
        }
    }

    /// A file whose conversion or write failed.
    pub fn failed(source_path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            source_path,
            destination_path: None,
            status: FileStatus::Failed,
            reason: Some(reason.into()),
            word_count: None,
            heading_count: None,
        }
    }
}

/// Aggregate result of a bulk conversion run.
///
/// Invariants (enforced by the orchestrator, asserted in tests):
/// `converted_count + skipped_count + failed_count == files.len()`, and
/// `total_words` / `total_headings` are the sums over converted outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResult {
    /// Resolved (canonical) source root.
    pub root: PathBuf,
    /// Resolved destination root containing the mirrored `.md` tree.
    pub dest: PathBuf,
    /// Per-file outcomes in traversal order.
    pub files: Vec<FileOutcome>,
    pub converted_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub total_words: usize,
    pub total_headings: usize,
}

impl BulkResult {
    /// One-line human summary, used by the CLI and handy for logs.
    pub fn summary(&self) -> String {
        format!(
            "Converted: {}, Skipped: {}, Failed: {}, Words: {}, Headings: {}",
            self.converted_count,
            self.skipped_count,
            self.failed_count,
            self.total_words,
            self.total_headings
        )
    }
}

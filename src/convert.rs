//! The bulk conversion orchestrator.
//!
//! ## Execution model
//!
//! A run is single-threaded, synchronous, and blocking: traversal,
//! conversion, and writing happen sequentially on the calling thread, one
//! file at a time in traversal order. A host serving concurrent requests
//! (e.g. an HTTP upload handler) must run `bulk_convert` off its dispatch
//! thread and give each run a distinct destination root — concurrent runs
//! sharing a destination race on conflict resolution and report writing.
//!
//! Callers wanting throughput can parallelise the per-file step behind a
//! bounded worker pool, as long as the per-file outcome contract holds and
//! outcomes are re-sorted by source path before report generation so reports
//! stay deterministic.
//!
//! ## Failure isolation
//!
//! Fatal errors (bad root, denied preflight, unwritable destination) return
//! `Err` immediately. Everything that goes wrong with a *single* file —
//! converter failure, unreadable input, write error — is caught at the file
//! boundary and recorded in that file's [`FileOutcome`]; the run continues
//! unless `continue_on_error` is false.

use crate::config::{BulkConfig, ConflictPolicy};
use crate::converter::DocumentConverter;
use crate::error::{BulkError, ConvertError};
use crate::output::{BulkResult, FileOutcome, FileStatus};
use crate::report::write_report;
use crate::resolve::{derive_output_path, ext_of, unique_path};
use crate::walk::{iter_files, preflight};
use crate::write::write_atomic;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Convert every eligible file under `root` into a mirrored Markdown tree.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `root`      — source directory to scan
/// * `converter` — the document-conversion capability (opaque, fallible)
/// * `config`    — run configuration, see [`BulkConfig`]
///
/// # Returns
/// `Ok(BulkResult)` on completion, even when some files failed
/// (check `result.failed_count` and the per-file outcomes).
///
/// # Errors
/// Returns `Err(BulkError)` only for fatal conditions:
/// - root missing or not a directory
/// - preflight thresholds exceeded without confirmation
/// - destination root or report not writable
pub fn bulk_convert(
    root: impl AsRef<Path>,
    converter: &dyn DocumentConverter,
    config: &BulkConfig,
) -> Result<BulkResult, BulkError> {
    // ── Step 1: Resolve the source root ──────────────────────────────────
    let root = root.as_ref();
    let src_root = std::fs::canonicalize(root).map_err(|_| BulkError::NotADirectory {
        path: root.to_path_buf(),
    })?;
    if !src_root.is_dir() {
        return Err(BulkError::NotADirectory { path: src_root });
    }

    // ── Step 2: Resolve and create the destination root ──────────────────
    let dest_root = config
        .dest
        .clone()
        .unwrap_or_else(|| md_sibling_dest(&src_root));
    std::fs::create_dir_all(&dest_root).map_err(|e| BulkError::DestinationCreateFailed {
        path: dest_root.clone(),
        source: e,
    })?;
    let dest_root =
        std::fs::canonicalize(&dest_root).map_err(|e| BulkError::DestinationCreateFailed {
            path: dest_root.clone(),
            source: e,
        })?;

    info!(
        "Starting bulk conversion: {} -> {}",
        src_root.display(),
        dest_root.display()
    );

    // ── Step 3: Preflight and threshold gate ─────────────────────────────
    // Exactly once per run, before any file is converted or written.
    let stats = preflight(&src_root, config.skip_hidden);
    debug!(
        "Preflight: {} dirs, {} files, {} bytes",
        stats.directory_count, stats.file_count, stats.total_bytes
    );
    if config.thresholds.exceeded_by(&stats) {
        let confirmed = config
            .confirm
            .as_ref()
            .map(|policy| policy.decide(&stats, &config.thresholds))
            .unwrap_or(false);
        if !confirmed {
            return Err(BulkError::PreflightExceeded {
                stats,
                thresholds: config.thresholds,
            });
        }
        info!("Preflight limits exceeded but confirmed; proceeding");
    }

    // ── Step 4: Normalise extension filters ──────────────────────────────
    let include = normalize_ext_set(config.include_ext.as_ref());
    let exclude = normalize_ext_set(config.exclude_ext.as_ref());

    if let Some(ref cb) = config.progress {
        cb.on_run_start(stats.file_count);
    }

    // ── Step 5: Convert each eligible file ───────────────────────────────
    let mut files: Vec<FileOutcome> = Vec::new();
    let mut converted = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut total_words = 0usize;
    let mut total_headings = 0usize;

    for src in iter_files(&src_root, config.skip_hidden) {
        let ext = ext_of(&src);
        let filtered_out = include.as_ref().map_or(false, |inc| !inc.contains(&ext))
            || exclude.as_ref().map_or(false, |exc| exc.contains(&ext));
        if filtered_out {
            let outcome = FileOutcome::skipped(src, "filtered");
            skipped += 1;
            if let Some(ref cb) = config.progress {
                cb.on_file_done(&outcome);
            }
            files.push(outcome);
            continue;
        }

        if let Some(ref cb) = config.progress {
            cb.on_file_start(&src);
        }

        let outcome = convert_one(&src, &src_root, &dest_root, converter, config.on_conflict);
        match outcome.status {
            FileStatus::Converted => {
                converted += 1;
                total_words += outcome.word_count.unwrap_or(0);
                total_headings += outcome.heading_count.unwrap_or(0);
            }
            FileStatus::Skipped => skipped += 1,
            FileStatus::Failed => {
                warn!(
                    "Failed to convert {}: {}",
                    outcome.source_path.display(),
                    outcome.reason.as_deref().unwrap_or("unknown error")
                );
                failed += 1;
            }
        }

        if let Some(ref cb) = config.progress {
            cb.on_file_done(&outcome);
        }

        let stop = outcome.status == FileStatus::Failed && !config.continue_on_error;
        files.push(outcome);
        if stop {
            info!("Stopping after first failure (continue_on_error = false)");
            break;
        }
    }

    if let Some(ref cb) = config.progress {
        cb.on_run_complete(converted, skipped, failed);
    }

    // ── Step 6: Assemble the result and write the report ─────────────────
    let result = BulkResult {
        root: src_root,
        dest: dest_root,
        files,
        converted_count: converted,
        skipped_count: skipped,
        failed_count: failed,
        total_words,
        total_headings,
    };

    let report_path = write_report(&result).map_err(|e| BulkError::ReportWriteFailed {
        path: result.dest.join(crate::report::REPORT_FILENAME),
        source: e,
    })?;

    info!(
        "Bulk conversion complete: {} (report: {})",
        result.summary(),
        report_path.display()
    );

    Ok(result)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Drive one file through resolve → conflict policy → convert → count → write.
///
/// Never returns an error: every failure mode is folded into the outcome.
fn convert_one(
    src: &Path,
    src_root: &Path,
    dest_root: &Path,
    converter: &dyn DocumentConverter,
    on_conflict: ConflictPolicy,
) -> FileOutcome {
    let candidate = derive_output_path(src, src_root, dest_root);

    let dest = match on_conflict {
        ConflictPolicy::Rename => unique_path(&candidate),
        ConflictPolicy::Skip => {
            if candidate.exists() {
                debug!("Skipping {} (destination exists)", src.display());
                return FileOutcome::skipped(src.to_path_buf(), "exists");
            }
            candidate
        }
    };

    let markdown = match converter.convert(src) {
        Ok(md) => md,
        Err(e) => return FileOutcome::failed(src.to_path_buf(), e.to_string()),
    };

    let (word_count, heading_count) = count_words_and_headings(&markdown);

    if let Err(e) = write_atomic(&dest, &markdown) {
        let e = ConvertError::Write {
            path: dest,
            source: e,
        };
        return FileOutcome::failed(src.to_path_buf(), e.to_string());
    }

    debug!("Converted {} -> {}", src.display(), dest.display());
    FileOutcome::converted(src.to_path_buf(), dest, word_count, heading_count)
}

/// Default destination: a sibling of `root` named `<root-name>-md`.
fn md_sibling_dest(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".into());
    root.parent().unwrap_or(root).join(format!("{name}-md"))
}

/// Lower-case and strip a leading dot from every extension in the set.
/// An empty or absent set means "no filter".
fn normalize_ext_set(set: Option<&HashSet<String>>) -> Option<HashSet<String>> {
    let set = set?;
    if set.is_empty() {
        return None;
    }
    Some(
        set.iter()
            .map(|e| {
                let e = e.strip_prefix('.').unwrap_or(e);
                e.to_lowercase()
            })
            .collect(),
    )
}

/// Lightweight text statistics over the converted Markdown: whitespace-
/// delimited token count, and count of lines whose first non-whitespace
/// character begins a heading marker.
fn count_words_and_headings(markdown: &str) -> (usize, usize) {
    let words = markdown.split_whitespace().count();
    let headings = markdown
        .lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .count();
    (words, headings)
}

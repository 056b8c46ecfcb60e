//! Human-readable summary report for a completed bulk run.
//!
//! The report groups converted files by their *source* directory so a reader
//! can see at a glance which parts of the tree produced documents, how large
//! they are in words, and which files failed and why. It is written — like
//! every other output — through the atomic writer, to a fixed filename in
//! the destination root, after all files have been processed.

use crate::output::{BulkResult, FileStatus};
use crate::resolve::ext_of;
use crate::write::write_atomic;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Fixed report filename inside the destination root.
pub const REPORT_FILENAME: &str = "process_report.md";

#[derive(Default)]
struct DirStats {
    by_ext: BTreeMap<String, usize>,
    documents: usize,
    words: usize,
    headings: usize,
}

/// Render the Markdown report for a completed run.
pub fn render_report(result: &BulkResult) -> String {
    // Keyed by path string so directory sections sort lexicographically.
    let mut per_dir: BTreeMap<String, DirStats> = BTreeMap::new();
    let mut errors: Vec<(&PathBuf, &str)> = Vec::new();

    for outcome in &result.files {
        match outcome.status {
            FileStatus::Converted => {
                let dir = outcome
                    .source_path
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                let stats = per_dir.entry(dir).or_default();
                *stats
                    .by_ext
                    .entry(ext_of(&outcome.source_path))
                    .or_default() += 1;
                stats.documents += 1;
                stats.words += outcome.word_count.unwrap_or(0);
                stats.headings += outcome.heading_count.unwrap_or(0);
            }
            FileStatus::Failed => {
                errors.push((
                    &outcome.source_path,
                    outcome.reason.as_deref().unwrap_or("unknown error"),
                ));
            }
            FileStatus::Skipped => {}
        }
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Bulk Conversion Report".into());
    lines.push(String::new());
    lines.push(format!("Root: {}", result.root.display()));
    lines.push(format!("Destination: {}", result.dest.display()));
    lines.push(String::new());
    lines.push("## Summary".into());
    lines.push(String::new());
    lines.push(format!("- Converted: {}", result.converted_count));
    lines.push(format!("- Skipped: {}", result.skipped_count));
    lines.push(format!("- Failed: {}", result.failed_count));
    lines.push(format!("- Total words: {}", result.total_words));
    lines.push(format!("- Total headings: {}", result.total_headings));
    lines.push(String::new());
    lines.push("## By Directory".into());
    lines.push(String::new());

    for (dir, stats) in &per_dir {
        lines.push(format!("### {dir}"));
        if !stats.by_ext.is_empty() {
            lines.push("- Files converted by type:".into());
            for (ext, count) in &stats.by_ext {
                lines.push(format!("  - .{ext}: {count}"));
            }
        }
        lines.push(format!("- Documents: {}", stats.documents));
        lines.push(format!("- Words: {}", stats.words));
        lines.push(format!("- Headings: {}", stats.headings));
        lines.push(String::new());
    }

    if !errors.is_empty() {
        lines.push("## Errors".into());
        lines.push(String::new());
        for (src, reason) in errors {
            lines.push(format!("- {}: {}", src.display(), reason));
        }
    }

    let mut text = lines.join("\n");
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Render and atomically write the report into `result.dest`.
///
/// Returns the report's path on success.
pub fn write_report(result: &BulkResult) -> io::Result<PathBuf> {
    let path = result.dest.join(REPORT_FILENAME);
    write_atomic(&path, &render_report(result))?;
    Ok(path)
}

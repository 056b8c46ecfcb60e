//! Filesystem traversal and preflight estimation.
//!
//! One walk primitive, two consumption modes: [`iter_files`] yields candidate
//! file paths for conversion, [`preflight`] counts directories, files, and
//! bytes without reading any content. Both are built on the same filtered
//! [`walkdir`] iterator so the hidden-entry rule can never drift between the
//! estimate and the actual conversion pass.
//!
//! Hidden entries (any path component starting with `.`) are pruned from
//! *descent*, not just from output: a visible file under a hidden directory
//! is never yielded and never counted.

use crate::output::PreflightStats;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// True when the entry's own name starts with the hidden-marker prefix.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// The shared walk: deterministic order (sorted by file name at each level),
/// hidden entries pruned when requested, unreadable entries logged and
/// dropped. The root itself is always visited, hidden or not — callers name
/// it explicitly.
fn walk(root: &Path, skip_hidden: bool) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| e.depth() == 0 || !skip_hidden || !is_hidden(e))
        .filter_map(|res| match res {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
}

/// Lazily yield every candidate file under `root`, in deterministic order
/// for a fixed filesystem snapshot.
///
/// The sequence is one-shot and finite; a fresh call re-walks the filesystem.
pub fn iter_files(root: &Path, skip_hidden: bool) -> impl Iterator<Item = PathBuf> {
    walk(root, skip_hidden)
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
}

/// Estimate the scope of work under `root` without reading file contents.
///
/// Counts directories visited (the root included), non-hidden files, and the
/// sum of file sizes from metadata. A file whose metadata cannot be read
/// (deleted between listing and stat, permission change) still counts as a
/// file but contributes 0 bytes — a best-effort tally, not a guarantee.
pub fn preflight(root: &Path, skip_hidden: bool) -> PreflightStats {
    let mut directory_count = 0usize;
    let mut file_count = 0usize;
    let mut total_bytes = 0u64;

    for entry in walk(root, skip_hidden) {
        if entry.file_type().is_dir() {
            directory_count += 1;
        } else if entry.file_type().is_file() {
            file_count += 1;
            total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    PreflightStats {
        root: root.to_path_buf(),
        directory_count,
        file_count,
        total_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tree(root: &Path) {
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/f1.txt"), "hello").unwrap();
        fs::write(root.join("a/f2.pdf"), "%PDF").unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join(".hidden/x.txt"), "secret").unwrap();
        fs::write(root.join(".dotfile"), "rc").unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/g.docx"), "docx").unwrap();
    }

    #[test]
    fn skips_hidden_files_and_whole_hidden_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let files: Vec<_> = iter_files(dir.path(), true).collect();
        assert_eq!(files.len(), 3, "got: {files:?}");
        for p in &files {
            let rel = p.strip_prefix(dir.path()).unwrap();
            assert!(
                rel.components()
                    .all(|c| !c.as_os_str().to_string_lossy().starts_with('.')),
                "hidden path leaked into the walk: {rel:?}"
            );
        }
    }

    #[test]
    fn includes_hidden_when_not_skipping() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let files: Vec<_> = iter_files(dir.path(), false).collect();
        assert_eq!(files.len(), 5, "got: {files:?}");
    }

    #[test]
    fn order_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let first: Vec<_> = iter_files(dir.path(), true).collect();
        let second: Vec<_> = iter_files(dir.path(), true).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn preflight_counts_match_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let stats = preflight(dir.path(), true);
        // root + a + b; .hidden is pruned
        assert_eq!(stats.directory_count, 3);
        assert_eq!(stats.file_count, 3);
        // "hello" + "%PDF" + "docx"
        assert_eq!(stats.total_bytes, 5 + 4 + 4);
        assert_eq!(stats.root, dir.path());
    }

    #[test]
    fn preflight_sees_hidden_when_not_skipping() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());

        let stats = preflight(dir.path(), false);
        assert_eq!(stats.directory_count, 4);
        assert_eq!(stats.file_count, 5);
    }

    #[test]
    fn empty_root_counts_itself() {
        let dir = tempfile::tempdir().unwrap();
        let stats = preflight(dir.path(), true);
        assert_eq!(stats.directory_count, 1);
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_bytes, 0);
    }
}

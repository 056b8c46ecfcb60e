//! Destination-path derivation and conflict-safe naming.
//!
//! A source file's output path is its path relative to the source root,
//! re-rooted under the destination root, with the extension replaced by
//! `.md`. When that path already exists, the rename policy appends the
//! lowest free numeric suffix — `report.md` → `report (1).md` →
//! `report (2).md` — stripping any existing `" (n)"` suffix from the stem
//! first, so repeated runs never compound into `report (1) (1).md`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// The canonical output extension.
pub const MD_EXTENSION: &str = "md";

/// Matches a trailing `" (n)"` conflict suffix on a file stem.
static RE_CONFLICT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r" \(\d+\)$").unwrap());

/// A path's extension normalised for filtering: lower-case, no leading dot,
/// empty string when absent.
pub fn ext_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Map `src` to its mirrored destination path with the Markdown extension.
///
/// # Panics
/// `src` must be a descendant of `root`; violating this is a programming
/// error in the caller, not a recoverable condition.
pub fn derive_output_path(src: &Path, root: &Path, dest_root: &Path) -> PathBuf {
    let rel = src
        .strip_prefix(root)
        .expect("src must be a descendant of root");
    dest_root.join(rel).with_extension(MD_EXTENSION)
}

/// Return `candidate` if nothing exists there, otherwise the first
/// non-colliding `stem (i).ext` sibling for the lowest positive `i`.
pub fn unique_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate.extension().map(|e| e.to_string_lossy().into_owned());

    // Strip an existing " (n)" so re-runs renumber from the same base.
    let base_stem = RE_CONFLICT_SUFFIX.replace(&stem, "");

    let mut i: u32 = 1;
    loop {
        let name = match &ext {
            Some(ext) => format!("{base_stem} ({i}).{ext}"),
            None => format!("{base_stem} ({i})"),
        };
        let cand = parent.join(name);
        if !cand.exists() {
            return cand;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn ext_of_normalises() {
        assert_eq!(ext_of(Path::new("a/B.PDF")), "pdf");
        assert_eq!(ext_of(Path::new("noext")), "");
        assert_eq!(ext_of(Path::new("archive.tar.gz")), "gz");
    }

    #[test]
    fn derive_mirrors_relative_path_and_swaps_extension() {
        let out = derive_output_path(
            Path::new("/src/a/b/doc.docx"),
            Path::new("/src"),
            Path::new("/out"),
        );
        assert_eq!(out, PathBuf::from("/out/a/b/doc.md"));
    }

    #[test]
    fn derive_handles_extensionless_sources() {
        let out = derive_output_path(Path::new("/src/README"), Path::new("/src"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/README.md"));
    }

    #[test]
    #[should_panic(expected = "descendant")]
    fn derive_panics_when_src_escapes_root() {
        derive_output_path(Path::new("/elsewhere/x.txt"), Path::new("/src"), Path::new("/out"));
    }

    #[test]
    fn unique_returns_original_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("file.md");
        assert_eq!(unique_path(&candidate), candidate);
    }

    #[test]
    fn unique_appends_lowest_free_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("file.md");
        fs::write(&candidate, "x").unwrap();

        let first = unique_path(&candidate);
        assert_eq!(first, dir.path().join("file (1).md"));

        fs::write(&first, "x").unwrap();
        let second = unique_path(&candidate);
        assert_eq!(second, dir.path().join("file (2).md"));
    }

    #[test]
    fn unique_strips_existing_suffix_instead_of_stacking() {
        let dir = tempfile::tempdir().unwrap();
        let numbered = dir.path().join("file (1).md");
        fs::write(&numbered, "x").unwrap();

        // "file (1) (1).md" must never appear.
        let next = unique_path(&numbered);
        assert_eq!(next, dir.path().join("file (2).md"));
    }

    #[test]
    fn unique_skips_over_occupied_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("file.md");
        fs::write(&candidate, "x").unwrap();
        fs::write(dir.path().join("file (1).md"), "x").unwrap();
        fs::write(dir.path().join("file (2).md"), "x").unwrap();

        assert_eq!(unique_path(&candidate), dir.path().join("file (3).md"));
    }
}

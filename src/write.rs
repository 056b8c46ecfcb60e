//! Atomic file writes.
//!
//! Output lands via a temporary sibling plus an atomic rename, so a reader
//! watching the destination never observes a partially written file: either
//! the old content (if any) or the complete new content is visible, never a
//! mix. The temp file lives in the same directory as the target because
//! rename is only atomic within a filesystem.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` atomically, creating ancestor directories.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_content_and_creates_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deep/nested/out.md");

        write_atomic(&target, "# Hello\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "# Hello\n");
    }

    #[test]
    fn replaces_existing_content_completely() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.md");

        write_atomic(&target, "old old old").unwrap();
        write_atomic(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn leaves_no_temporary_siblings_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.md");
        write_atomic(&target, "content").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.md")]);
    }
}

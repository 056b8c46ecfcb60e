//! The document-conversion capability boundary.
//!
//! Format-specific parsing (PDF, DOCX, HTML, …) is deliberately **not** this
//! crate's job. The orchestrator only needs one operation — "give me Markdown
//! for this file" — so that is the whole trait. Hosts plug in whatever parser
//! stack they run in production; tests plug in fakes; the CLI ships with the
//! minimal [`PlainTextConverter`] so the binary works end-to-end on text
//! formats out of the box.

use crate::error::ConvertError;
use std::path::Path;

/// Converts a single document file into Markdown text.
///
/// Implementations may fail with any [`ConvertError`]; the orchestrator
/// isolates the failure to that file's outcome. `Send + Sync` so one
/// converter instance can serve hosts that run multiple bulk runs.
pub trait DocumentConverter: Send + Sync {
    /// Parse the file at `path` and return its Markdown rendition.
    fn convert(&self, path: &Path) -> Result<String, ConvertError>;
}

/// Passthrough converter for files that already are (or trivially embed)
/// Markdown-compatible text.
///
/// Reads the file as UTF-8 and returns it verbatim — plain text is valid
/// Markdown, and `.md` inputs need no transformation. Anything outside the
/// supported extension list fails with [`ConvertError::UnsupportedFormat`],
/// which the orchestrator records as a per-file failure rather than aborting
/// the run.
#[derive(Debug, Default)]
pub struct PlainTextConverter;

/// Extensions [`PlainTextConverter`] accepts, lower-case.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "log"];

impl DocumentConverter for PlainTextConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ConvertError::UnsupportedFormat {
                path: path.to_path_buf(),
                ext,
            });
        }

        std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                ConvertError::Malformed {
                    path: path.to_path_buf(),
                    detail: "file is not valid UTF-8".into(),
                }
            } else {
                ConvertError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn converts_plain_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("note.txt");
        std::fs::write(&p, "# Title\n\nhello world\n").unwrap();

        let md = PlainTextConverter.convert(&p).unwrap();
        assert_eq!(md, "# Title\n\nhello world\n");
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("report.pdf");
        std::fs::write(&p, "%PDF-1.7").unwrap();

        let err = PlainTextConverter.convert(&p).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("NOTES.TXT");
        std::fs::write(&p, "shouting").unwrap();

        assert_eq!(PlainTextConverter.convert(&p).unwrap(), "shouting");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.txt");
        let mut f = std::fs::File::create(&p).unwrap();
        f.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = PlainTextConverter.convert(&p).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = PlainTextConverter
            .convert(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
    }
}

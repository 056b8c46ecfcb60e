//! # mdbulk
//!
//! Bulk-convert a directory tree of documents to Markdown.
//!
//! ## Why this crate?
//!
//! Converting one document is easy; converting a *tree* of them safely is
//! not. A naive recursive loop happily chews through an unexpectedly huge
//! directory, overwrites outputs from earlier runs, leaves half-written
//! files behind on a crash, and gives up entirely when one malformed
//! document throws. This crate is the orchestration layer that handles all
//! of that: it estimates the work up front, asks before doing anything big,
//! isolates every per-file failure, never clobbers or tears an output file,
//! and tells you exactly what happened afterwards.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source tree
//!  │
//!  ├─ 1. Preflight  walk once, count dirs / files / bytes (no reads)
//!  ├─ 2. Gate       over thresholds? ask the ConfirmPolicy or fail
//!  ├─ 3. Traverse   deterministic walk, hidden entries pruned
//!  ├─ 4. Filter     case-insensitive include / exclude extension sets
//!  ├─ 5. Convert    DocumentConverter::convert, failures isolated per file
//!  ├─ 6. Write      mirrored .md path, conflict policy, atomic rename
//!  └─ 7. Report     per-directory stats + error list → process_report.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdbulk::{bulk_convert, BulkConfig, PlainTextConverter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BulkConfig::builder()
//!         .include_ext(["txt", "md"])
//!         .build()?;
//!     let result = bulk_convert("./notes", &PlainTextConverter, &config)?;
//!     println!("{}", result.summary());
//!     eprintln!("report: {}/process_report.md", result.dest.display());
//!     Ok(())
//! }
//! ```
//!
//! ## The converter is yours
//!
//! Format-specific parsing (PDF, DOCX, HTML, …) lives behind the one-method
//! [`DocumentConverter`] trait. The crate ships only [`PlainTextConverter`]
//! (UTF-8 passthrough) so the CLI works out of the box; production hosts
//! plug in their own parser stack, tests plug in fakes.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdbulk` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! mdbulk = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converter;
pub mod error;
pub mod output;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod walk;
pub mod write;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BulkConfig, BulkConfigBuilder, ConfirmPolicy, ConflictPolicy, Thresholds};
pub use convert::bulk_convert;
pub use converter::{DocumentConverter, PlainTextConverter};
pub use error::{BulkError, ConvertError};
pub use output::{BulkResult, FileOutcome, FileStatus, PreflightStats};
pub use progress::{BulkProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{render_report, REPORT_FILENAME};

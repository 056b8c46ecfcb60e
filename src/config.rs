//! Configuration types for bulk directory conversion.
//!
//! All run behaviour is controlled through [`BulkConfig`], built via its
//! [`BulkConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across callers, log them, and diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::BulkError;
use crate::output::PreflightStats;
use crate::progress::BulkProgressCallback;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Preflight limits above which a run requires explicit confirmation.
///
/// A traversal exceeding **any one** field triggers the gate. The defaults
/// are deliberately conservative: converting a whole tree is expensive
/// (every file is parsed), so an unexpectedly large source should stop and
/// ask rather than churn for minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    /// Maximum directories before confirmation is required. Default: 16.
    pub max_dirs: usize,
    /// Maximum files before confirmation is required. Default: 128.
    pub max_files: usize,
    /// Maximum total size in bytes before confirmation is required.
    /// Default: 300 MiB.
    pub max_bytes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_dirs: 16,
            max_files: 128,
            max_bytes: 300 * 1024 * 1024,
        }
    }
}

impl Thresholds {
    /// True when `stats` exceeds any one limit.
    pub fn exceeded_by(&self, stats: &PreflightStats) -> bool {
        stats.directory_count > self.max_dirs
            || stats.file_count > self.max_files
            || stats.total_bytes > self.max_bytes
    }
}

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Write to `stem (1).md`, `stem (2).md`, … — first free suffix wins. (default)
    #[default]
    Rename,
    /// Leave the existing file alone and record the source as skipped.
    Skip,
}

/// Policy decision for proceeding past exceeded preflight thresholds.
///
/// This is a capability parameter, not global state: the CLI binds an
/// interactive prompt, an HTTP host binds a request parameter, tests bind a
/// constant. Absence of a policy means an exceeded preflight always fails
/// with [`BulkError::PreflightExceeded`].
///
/// Implemented for plain closures, so tests can write
/// `.confirm(Arc::new(|_: &PreflightStats, _: &Thresholds| true))`.
pub trait ConfirmPolicy: Send + Sync {
    /// Return `true` to proceed with the run despite exceeded limits.
    fn decide(&self, stats: &PreflightStats, thresholds: &Thresholds) -> bool;
}

impl<F> ConfirmPolicy for F
where
    F: Fn(&PreflightStats, &Thresholds) -> bool + Send + Sync,
{
    fn decide(&self, stats: &PreflightStats, thresholds: &Thresholds) -> bool {
        self(stats, thresholds)
    }
}

/// Configuration for a bulk conversion run.
///
/// Built via [`BulkConfig::builder()`] or [`BulkConfig::default()`].
///
/// # Example
/// ```rust
/// use mdbulk::{BulkConfig, ConflictPolicy};
///
/// let config = BulkConfig::builder()
///     .include_ext(["pdf", "docx"])
///     .on_conflict(ConflictPolicy::Skip)
///     .continue_on_error(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct BulkConfig {
    /// Destination root for the mirrored `.md` tree.
    /// If `None`, a sibling of the source root named `<root-name>-md` is used.
    pub dest: Option<PathBuf>,

    /// Only convert files with these extensions (case-insensitive, leading
    /// dot ignored). `None` or empty means "all extensions".
    pub include_ext: Option<HashSet<String>>,

    /// Never convert files with these extensions. Applied after `include_ext`.
    pub exclude_ext: Option<HashSet<String>>,

    /// What to do when the destination file already exists. Default: rename.
    pub on_conflict: ConflictPolicy,

    /// Keep going after a per-file failure. Default: true.
    ///
    /// When false, the first failed file ends the run immediately; outcomes
    /// recorded so far are retained in the result.
    pub continue_on_error: bool,

    /// Preflight limits. Default: 16 dirs / 128 files / 300 MiB.
    pub thresholds: Thresholds,

    /// Confirmation policy consulted when `thresholds` are exceeded.
    /// `None` means an exceeded preflight always fails.
    pub confirm: Option<Arc<dyn ConfirmPolicy>>,

    /// Prune `.`-prefixed directories and files from the walk. Default: true.
    pub skip_hidden: bool,

    /// Optional per-file progress events (progress bars, logs, websockets).
    pub progress: Option<Arc<dyn BulkProgressCallback>>,
}

impl fmt::Debug for BulkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkConfig")
            .field("dest", &self.dest)
            .field("include_ext", &self.include_ext)
            .field("exclude_ext", &self.exclude_ext)
            .field("on_conflict", &self.on_conflict)
            .field("continue_on_error", &self.continue_on_error)
            .field("thresholds", &self.thresholds)
            .field("confirm", &self.confirm.as_ref().map(|_| "<dyn ConfirmPolicy>"))
            .field("skip_hidden", &self.skip_hidden)
            .field(
                "progress",
                &self.progress.as_ref().map(|_| "<dyn BulkProgressCallback>"),
            )
            .finish()
    }
}

impl BulkConfig {
    /// Create a new builder with the documented defaults.
    pub fn builder() -> BulkConfigBuilder {
        BulkConfigBuilder {
            config: Self {
                continue_on_error: true,
                skip_hidden: true,
                ..Self::default()
            },
        }
    }
}

/// Builder for [`BulkConfig`].
#[derive(Debug)]
pub struct BulkConfigBuilder {
    config: BulkConfig,
}

impl BulkConfigBuilder {
    pub fn dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.config.dest = Some(dest.into());
        self
    }

    pub fn include_ext<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.include_ext = Some(exts.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_ext<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude_ext = Some(exts.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.config.on_conflict = policy;
        self
    }

    pub fn continue_on_error(mut self, v: bool) -> Self {
        self.config.continue_on_error = v;
        self
    }

    pub fn thresholds(mut self, t: Thresholds) -> Self {
        self.config.thresholds = t;
        self
    }

    pub fn confirm(mut self, policy: Arc<dyn ConfirmPolicy>) -> Self {
        self.config.confirm = Some(policy);
        self
    }

    pub fn skip_hidden(mut self, v: bool) -> Self {
        self.config.skip_hidden = v;
        self
    }

    pub fn progress(mut self, cb: Arc<dyn BulkProgressCallback>) -> Self {
        self.config.progress = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BulkConfig, BulkError> {
        let c = &self.config;
        // The root itself counts as one directory, so a zero limit could
        // never pass the gate even for an empty tree.
        if c.thresholds.max_dirs == 0 {
            return Err(BulkError::InvalidConfig(
                "thresholds.max_dirs must be ≥ 1 (the root counts as a directory)".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.max_dirs, 16);
        assert_eq!(t.max_files, 128);
        assert_eq!(t.max_bytes, 300 * 1024 * 1024);
    }

    #[test]
    fn exceeded_when_any_limit_crossed() {
        let t = Thresholds {
            max_dirs: 1,
            max_files: 2,
            max_bytes: 10,
        };
        let base = PreflightStats {
            root: PathBuf::from("/r"),
            directory_count: 1,
            file_count: 2,
            total_bytes: 10,
        };
        assert!(!t.exceeded_by(&base), "at-limit must not trigger the gate");

        let mut s = base.clone();
        s.directory_count = 2;
        assert!(t.exceeded_by(&s));

        let mut s = base.clone();
        s.file_count = 3;
        assert!(t.exceeded_by(&s));

        let mut s = base;
        s.total_bytes = 11;
        assert!(t.exceeded_by(&s));
    }

    #[test]
    fn builder_defaults() {
        let c = BulkConfig::builder().build().unwrap();
        assert!(c.continue_on_error);
        assert!(c.skip_hidden);
        assert_eq!(c.on_conflict, ConflictPolicy::Rename);
        assert!(c.dest.is_none());
        assert!(c.confirm.is_none());
    }

    #[test]
    fn builder_rejects_zero_dir_threshold() {
        let err = BulkConfig::builder()
            .thresholds(Thresholds {
                max_dirs: 0,
                max_files: 128,
                max_bytes: 1024,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_dirs"));
    }

    #[test]
    fn closure_implements_confirm_policy() {
        let policy: Arc<dyn ConfirmPolicy> =
            Arc::new(|_: &PreflightStats, _: &Thresholds| true);
        let stats = PreflightStats {
            root: PathBuf::from("/r"),
            directory_count: 99,
            file_count: 99,
            total_bytes: 99,
        };
        assert!(policy.decide(&stats, &Thresholds::default()));
    }
}

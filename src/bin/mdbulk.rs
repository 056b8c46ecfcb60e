//! CLI binary for mdbulk.
//!
//! A thin shim over the library crate that maps CLI flags to `BulkConfig`,
//! wires an interactive confirmation prompt and an indicatif progress bar
//! into the capability slots, and translates errors into exit codes:
//! 0 full success, 1 partial failure (with --fail-fast) or unexpected error,
//! 2 preflight limits exceeded and not confirmed.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdbulk::{
    bulk_convert, BulkConfig, BulkProgressCallback, ConfirmPolicy, ConflictPolicy, FileOutcome,
    FileStatus, PlainTextConverter, PreflightStats, Thresholds, REPORT_FILENAME,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar anchored at the bottom, one log line per file.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BulkProgressCallback for CliProgress {
    fn on_run_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_file_start(&self, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_file_done(&self, outcome: &FileOutcome) {
        let name = outcome.source_path.display();
        match outcome.status {
            FileStatus::Converted => {
                let words = outcome.word_count.unwrap_or(0);
                self.bar.println(format!(
                    "  {} {}  {}",
                    green("✓"),
                    name,
                    dim(&format!("{words} words"))
                ));
            }
            FileStatus::Skipped => {
                self.bar.println(format!(
                    "  {} {}  {}",
                    dim("↷"),
                    name,
                    dim(outcome.reason.as_deref().unwrap_or("skipped"))
                ));
            }
            FileStatus::Failed => {
                let reason = outcome.reason.as_deref().unwrap_or("unknown error");
                let msg = truncate_reason(reason, 80);
                self.bar
                    .println(format!("  {} {}  {}", red("✗"), name, red(&msg)));
            }
        }
        self.bar.inc(1);
    }

    fn on_run_complete(&self, converted: usize, skipped: usize, failed: usize) {
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} converted, {} skipped",
                green("✔"),
                bold(&converted.to_string()),
                skipped
            );
        } else {
            eprintln!(
                "{} {} converted, {} skipped, {} failed",
                cyan("⚠"),
                bold(&converted.to_string()),
                skipped,
                red(&failed.to_string()),
            );
        }
    }
}

/// Shorten very long error messages to keep the per-file log tidy.
///
/// Truncates on character boundaries, not bytes: error messages embed file
/// paths, which are frequently non-ASCII.
fn truncate_reason(reason: &str, max_chars: usize) -> String {
    if reason.chars().count() <= max_chars {
        return reason.to_string();
    }
    let mut msg: String = reason.chars().take(max_chars.saturating_sub(1)).collect();
    msg.push('\u{2026}');
    msg
}

// ── Interactive confirmation prompt ──────────────────────────────────────────

/// Preflight confirmation bound to the terminal: prints the measured stats
/// against the limits and reads y/N from stdin. `--yes` short-circuits it.
struct PromptConfirm {
    auto_yes: bool,
}

impl ConfirmPolicy for PromptConfirm {
    fn decide(&self, stats: &PreflightStats, thresholds: &Thresholds) -> bool {
        if self.auto_yes {
            return true;
        }
        eprint!(
            "Preflight limits exceeded. Dirs: {}/{}, Files: {}/{}, Size: {}/{} bytes. Proceed? [y/N]: ",
            stats.directory_count,
            thresholds.max_dirs,
            stats.file_count,
            thresholds.max_files,
            stats.total_bytes,
            thresholds.max_bytes,
        );
        io::stderr().flush().ok();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false, // EOF or read failure means "no"
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a notes tree into ./notes-md
  mdbulk ./notes

  # Only text-like formats, explicit destination
  mdbulk ./docs --dest ./docs-out --include txt md

  # Re-run without overwriting anything produced earlier
  mdbulk ./docs --on-conflict skip

  # Big tree: raise the limits and auto-confirm
  mdbulk ./archive --threshold-files 10000 --threshold-mb 2048 --yes

  # Stop at the first broken document
  mdbulk ./docs --fail-fast

EXIT CODES:
  0  full success (or partial failure while continuing past errors)
  1  partial failure with --fail-fast, or an unexpected error
  2  preflight limits exceeded and not confirmed

The run writes a summary report to <dest>/process_report.md.
"#;

/// Bulk-convert a directory tree of documents to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "mdbulk",
    version,
    about = "Bulk-convert a directory tree of documents to Markdown",
    long_about = "Recursively convert every eligible file under ROOT into a mirrored tree of \
Markdown files, with preflight size checks, conflict-safe output naming, atomic writes, and a \
per-directory summary report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Root directory to scan for input files.
    root: PathBuf,

    /// Destination root (default: sibling of ROOT named "<root>-md").
    #[arg(short, long, env = "MDBULK_DEST")]
    dest: Option<PathBuf>,

    /// Only convert these extensions (e.g. --include pdf docx).
    #[arg(long, num_args = 1.., value_name = "EXT")]
    include: Vec<String>,

    /// Skip these extensions.
    #[arg(long, num_args = 1.., value_name = "EXT")]
    exclude: Vec<String>,

    /// When the output file exists: rename with a numeric suffix, or skip.
    #[arg(long, value_enum, default_value = "rename", env = "MDBULK_ON_CONFLICT")]
    on_conflict: ConflictArg,

    /// Stop on the first per-file failure instead of continuing.
    #[arg(long, env = "MDBULK_FAIL_FAST")]
    fail_fast: bool,

    /// Include hidden ('.'-prefixed) files and directories.
    #[arg(long)]
    no_skip_hidden: bool,

    /// Max directories before confirmation is required.
    #[arg(long, default_value_t = 16, env = "MDBULK_THRESHOLD_DIRS")]
    threshold_dirs: usize,

    /// Max files before confirmation is required.
    #[arg(long, default_value_t = 128, env = "MDBULK_THRESHOLD_FILES")]
    threshold_files: usize,

    /// Max total size (MiB) before confirmation is required.
    #[arg(long, default_value_t = 300, env = "MDBULK_THRESHOLD_MB")]
    threshold_mb: u64,

    /// Auto-confirm running above thresholds.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Output the full result as JSON instead of the text summary.
    #[arg(long, env = "MDBULK_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MDBULK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDBULK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDBULK_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ConflictArg {
    Rename,
    Skip,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(v: ConflictArg) -> Self {
        match v {
            ConflictArg::Rename => ConflictPolicy::Rename,
            ConflictArg::Skip => ConflictPolicy::Skip,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("✘"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = BulkConfig::builder()
        .on_conflict(cli.on_conflict.into())
        .continue_on_error(!cli.fail_fast)
        .skip_hidden(!cli.no_skip_hidden)
        .thresholds(Thresholds {
            max_dirs: cli.threshold_dirs,
            max_files: cli.threshold_files,
            max_bytes: cli.threshold_mb * 1024 * 1024,
        })
        .confirm(Arc::new(PromptConfirm { auto_yes: cli.yes }));

    if let Some(ref dest) = cli.dest {
        builder = builder.dest(dest);
    }
    if !cli.include.is_empty() {
        builder = builder.include_ext(cli.include.clone());
    }
    if !cli.exclude.is_empty() {
        builder = builder.exclude_ext(cli.exclude.clone());
    }
    if show_progress {
        builder = builder.progress(CliProgress::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let result = match bulk_convert(&cli.root, &PlainTextConverter, &config) {
        Ok(result) => result,
        Err(e @ mdbulk::BulkError::PreflightExceeded { .. }) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        println!("{}", result.summary());
        println!(
            "Report written to: {}",
            result.dest.join(REPORT_FILENAME).display()
        );
    }

    // Partial failure is only an error exit when the run was asked to stop
    // at the first failure.
    if result.failed_count > 0 && cli.fail_fast {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

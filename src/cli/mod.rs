//! CLI command definitions and handlers

pub(crate) mod analyze;
mod init;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Worker count used when `--workers` is not given
pub const DEFAULT_WORKERS: usize = 8;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Docaudit - documentation corpus auditor
///
/// Runs entirely offline. Only reads files and local git history.
#[derive(Parser, Debug)]
#[command(name = "docaudit")]
#[command(
    version,
    about = "Audit a documentation corpus: broken links, orphans, front matter, near-duplicates and stale pages",
    long_about = "Docaudit scans every Markdown and text file under a directory, builds the \
link graph between them, and reports broken links, orphaned pages, dead ends, \
incomplete front matter, near-duplicate documents and files nobody has touched in a while.\n\n\
Run without a subcommand to audit the current directory:\n  \
docaudit .",
    after_help = "\
Examples:
  docaudit .                             Audit current directory, write reports next to it
  docaudit analyze docs --format json    JSON on stdout for scripting
  docaudit analyze . --no-write          Print the summary only
  docaudit analyze . --fail-on-issues    Exit code 1 if anything was found (CI mode)
  docaudit init                          Write a docaudit.toml with every setting"
)]
pub struct Cli {
    /// Path to the documentation root (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default 8 or docaudit.toml)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit the documentation corpus (default command)
    #[command(after_help = "\
Examples:
  docaudit analyze .                          Terminal summary plus report files
  docaudit analyze . --format markdown        Full issue report on stdout
  docaudit analyze . --out-dir reports        Write report files to ./reports
  docaudit analyze . --ext md,mdx,rst         Audit other extensions
  docaudit analyze . --stale-days 180         Relax the staleness window
  docaudit analyze . --no-git                 Skip history lookups")]
    Analyze(AnalyzeArgs),

    /// Write a docaudit.toml config file with every setting and its default
    Init {
        /// Overwrite an existing docaudit.toml
        #[arg(long)]
        force: bool,
    },
}

/// Flags of the analyze command; unset options fall back to docaudit.toml
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Output format on stdout: text, json, csv, markdown (or md)
    #[arg(long, short = 'f', value_parser = ["text", "json", "csv", "markdown", "md"])]
    pub format: Option<String>,

    /// Directory for the timestamped report files (default: PATH)
    #[arg(long, short = 'o')]
    pub out_dir: Option<PathBuf>,

    /// Do not write report files, only print to stdout
    #[arg(long)]
    pub no_write: bool,

    /// Report files whose last commit is older than this many days
    #[arg(long)]
    pub stale_days: Option<u32>,

    /// File extensions to audit (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Directory names to skip at any depth (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip version-control history lookups
    #[arg(long)]
    pub no_git: bool,

    /// Git implementation for history lookups: cli or libgit2
    #[arg(long)]
    pub git_backend: Option<String>,

    /// Bytes read per file
    #[arg(long)]
    pub max_bytes: Option<usize>,

    /// Token estimate multiplier per word
    #[arg(long)]
    pub tokens_per_word: Option<f64>,

    /// Maximum fingerprint distance (in bits) for near-duplicates
    #[arg(long)]
    pub similarity_threshold: Option<u32>,

    /// Accept link targets that exist on disk even if they are not audited documents
    #[arg(long)]
    pub check_filesystem: bool,

    /// Exit with code 1 if any issue was found
    #[arg(long)]
    pub fail_on_issues: bool,
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init { force }) => init::run(&cli.path, force),
        Some(Commands::Analyze(args)) => analyze::run(&cli.path, cli.workers, args),
        None => analyze::run(&cli.path, cli.workers, AnalyzeArgs::default()),
    }
}

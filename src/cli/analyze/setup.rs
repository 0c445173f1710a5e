//! Environment setup, configuration, and UI helpers for the analyze command.

use crate::cli::{AnalyzeArgs, DEFAULT_WORKERS};
use crate::config::{load_project_config, AuditConfig};
use crate::git::GitBackend;
use crate::reporters::OutputFormat;

use anyhow::{Context, Result};
use console::style;
use indicatif::{MultiProgress, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings for one analyze run after CLI flags and docaudit.toml are merged
#[derive(Debug, Clone)]
pub(super) struct AnalysisSettings {
    pub config: AuditConfig,
    pub format: OutputFormat,
    pub workers: usize,
    /// `None` when report files are not written
    pub out_dir: Option<PathBuf>,
    pub use_git: bool,
    pub fail_on_issues: bool,
}

/// Result of environment setup phase
pub(super) struct EnvironmentSetup {
    pub root: PathBuf,
    pub settings: AnalysisSettings,
    pub quiet_mode: bool,
}

/// Phase 1: Validate the documentation root and merge configuration
pub(super) fn setup_environment(
    path: &Path,
    workers: Option<usize>,
    args: &AnalyzeArgs,
) -> Result<EnvironmentSetup> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Documentation root does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let project_config = load_project_config(&root);
    let settings = apply_overrides(&root, workers, args, project_config)?;
    let quiet_mode = settings.format.is_machine_readable();

    Ok(EnvironmentSetup {
        root,
        settings,
        quiet_mode,
    })
}

/// CLI flags win over docaudit.toml, which wins over built-in defaults
pub(super) fn apply_overrides(
    root: &Path,
    workers: Option<usize>,
    args: &AnalyzeArgs,
    mut config: AuditConfig,
) -> Result<AnalysisSettings> {
    if !args.ext.is_empty() {
        config.scan.extensions = args.ext.clone();
    }
    if !args.exclude.is_empty() {
        config.scan.exclude_dirs = args.exclude.clone();
    }
    if let Some(max_bytes) = args.max_bytes {
        config.scan.max_bytes = max_bytes;
    }
    if let Some(tokens_per_word) = args.tokens_per_word {
        config.scan.tokens_per_word = tokens_per_word;
    }
    if let Some(threshold) = args.similarity_threshold {
        config.similarity.threshold_bits = threshold;
    }
    if let Some(stale_days) = args.stale_days {
        config.git.stale_days = stale_days;
    }
    if let Some(ref backend) = args.git_backend {
        config.git.backend = GitBackend::from_str(backend).map_err(anyhow::Error::msg)?;
    }
    if args.check_filesystem {
        config.links.check_filesystem = true;
    }

    let format_name = args
        .format
        .clone()
        .or_else(|| config.defaults.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let format = OutputFormat::from_str(&format_name)?;

    let workers = workers
        .or(config.defaults.workers)
        .unwrap_or(DEFAULT_WORKERS)
        .clamp(1, 64);

    let out_dir = if args.no_write {
        None
    } else {
        Some(args.out_dir.clone().unwrap_or_else(|| root.to_path_buf()))
    };

    Ok(AnalysisSettings {
        use_git: !args.no_git && config.git.enabled,
        fail_on_issues: args.fail_on_issues,
        config,
        format,
        workers,
        out_dir,
    })
}

/// Print analysis header
pub(super) fn print_header(root: &Path, quiet_mode: bool) {
    // Suppress progress output for machine-readable formats
    if quiet_mode {
        return;
    }

    println!("\n{}\n", style("Docaudit").bold());
    println!("Auditing: {}\n", style(root.display()).cyan());
}

/// Progress container; hidden for machine-readable formats
pub(super) fn progress(quiet_mode: bool) -> MultiProgress {
    if quiet_mode {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    }
}

/// Create spinner progress style
pub(super) fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .expect("valid template")
}

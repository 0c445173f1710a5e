//! Analyze command implementation
//!
//! Orchestrates a documentation audit from the command line:
//! 1. Setup environment and merge configuration   (setup.rs)
//! 2. Discover and scan documents
//! 3. Look up version-control history
//! 4. Build the link graph, cluster and aggregate
//! 5. Output results (text, json, csv, markdown)  (output.rs)

mod output;
mod setup;

use output::{check_fail_threshold, print_report, print_written, write_reports};
use setup::{create_spinner_style, print_header, progress, setup_environment, AnalysisSettings};

use crate::cli::AnalyzeArgs;
use crate::git::{self, NoVcs, VcsProvider};
use crate::pipeline::{with_workers, AuditOutcome, Auditor};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};

/// Run the analyze command
pub fn run(path: &Path, workers: Option<usize>, args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    let env = setup_environment(path, workers, &args)?;
    print_header(&env.root, env.quiet_mode);

    let auditor =
        Auditor::new(env.settings.config.clone()).context("Cannot start documentation audit")?;
    let now = Utc::now();

    let multi = progress(env.quiet_mode);
    let spinner_style = create_spinner_style();
    let outcome = with_workers(env.settings.workers, || {
        execute_audit(&auditor, &env.root, &env.settings, now, &multi, &spinner_style)
    })??;

    if !env.quiet_mode {
        println!(
            "\n{}Audit complete in {:.2}s\n",
            style("✓ ").green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    print_report(&outcome, env.settings.format)?;

    if let Some(ref out_dir) = env.settings.out_dir {
        let written = write_reports(&outcome, out_dir, now)?;
        if !env.quiet_mode {
            print_written(&written);
        }
    }

    check_fail_threshold(env.settings.fail_on_issues, &outcome);
    Ok(())
}

/// Phases 2-4 on the worker pool, one spinner per phase
fn execute_audit(
    auditor: &Auditor,
    root: &Path,
    settings: &AnalysisSettings,
    now: DateTime<Utc>,
    multi: &MultiProgress,
    spinner_style: &ProgressStyle,
) -> Result<AuditOutcome> {
    let spinner = start_spinner(multi, spinner_style, "Discovering documents...");
    let files = auditor.discover(root)?;
    spinner.finish_with_message(format!(
        "{}Found {} documents",
        style("✓ ").green(),
        style(files.len()).cyan()
    ));

    let spinner = start_spinner(multi, spinner_style, "Scanning documents...");
    let batch = auditor.scan(root, &files);
    let skipped = if batch.skipped.is_empty() {
        String::new()
    } else {
        format!(" ({} skipped)", style(batch.skipped.len()).yellow())
    };
    spinner.finish_with_message(format!(
        "{}Scanned {} documents{}",
        style("✓ ").green(),
        style(batch.records.len()).cyan(),
        skipped
    ));

    let spinner = start_spinner(multi, spinner_style, "Opening version control...");
    let vcs = open_vcs(root, settings);
    if vcs.enabled() {
        spinner.finish_with_message(format!(
            "{}History from {}",
            style("✓ ").green(),
            style(vcs.name()).cyan()
        ));
    } else {
        spinner.finish_with_message(format!("{}History lookups disabled", style("- ").dim()));
    }

    let spinner = start_spinner(multi, spinner_style, "Auditing links and front matter...");
    let outcome = auditor.analyze(root, batch, vcs.as_ref(), now)?;
    spinner.finish_with_message(format!(
        "{}Found {} issues",
        style("✓ ").green(),
        style(outcome.issues.total()).cyan()
    ));

    Ok(outcome)
}

fn start_spinner(multi: &MultiProgress, spinner_style: &ProgressStyle, message: &'static str) -> ProgressBar {
    let spinner = multi.add(ProgressBar::new_spinner());
    spinner.set_style(spinner_style.clone());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn open_vcs(root: &Path, settings: &AnalysisSettings) -> Box<dyn VcsProvider> {
    if !settings.use_git {
        return Box::new(NoVcs);
    }
    let git_config = &settings.config.git;
    git::open_provider(root, git_config.backend, git_config.timeout())
}

//! Output functions for the analyze command
//!
//! - Printing the selected format on stdout
//! - Writing the timestamped report files
//! - Threshold check for CI/CD

use crate::pipeline::AuditOutcome;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use std::path::{Path, PathBuf};

/// Report files written on every run: (file stem, format)
const REPORT_FILES: &[(&str, OutputFormat)] = &[
    ("repo_metrics", OutputFormat::Json),
    ("file_metrics", OutputFormat::Csv),
    ("issues", OutputFormat::Markdown),
];

/// `20240501-123000Z`
pub(super) fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d-%H%M%SZ").to_string()
}

/// Print the report in the selected format on stdout
pub(super) fn print_report(outcome: &AuditOutcome, format: OutputFormat) -> Result<()> {
    let output = reporters::report_with_format(outcome, format)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Write JSON, CSV and Markdown reports into `out_dir`
pub(super) fn write_reports(
    outcome: &AuditOutcome,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let stamp = file_timestamp(now);
    let mut written = Vec::with_capacity(REPORT_FILES.len());
    for (stem, format) in REPORT_FILES {
        let content = reporters::report_with_format(outcome, *format)?;
        let path = out_dir.join(format!(
            "{}-{}.{}",
            stem,
            stamp,
            reporters::file_extension(*format)
        ));
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Print where the report files went
pub(super) fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}Wrote {}", style("✓ ").green(), style(path.display()).cyan());
    }
}

/// Whether `--fail-on-issues` should turn this run into a failure
pub(super) fn should_fail(fail_on_issues: bool, outcome: &AuditOutcome) -> bool {
    fail_on_issues && !outcome.issues.is_empty()
}

/// Exit with code 1 if `--fail-on-issues` is set and anything was found
pub(super) fn check_fail_threshold(fail_on_issues: bool, outcome: &AuditOutcome) {
    if should_fail(fail_on_issues, outcome) {
        eprintln!(
            "Failing due to --fail-on-issues ({} issues)",
            outcome.issues.total()
        );
        std::process::exit(1);
    }
}

//! Output reporters for audit results
//!
//! Supports multiple output formats:
//! - `text` - Terminal summary with colors
//! - `json` - Repository metrics plus the full issue report
//! - `csv` - One row of metrics per document
//! - `markdown` - Human-readable issue report

mod csv;
mod json;
mod markdown;
mod text;

use crate::pipeline::AuditOutcome;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl OutputFormat {
    /// Formats meant for machines; progress output is suppressed for these
    pub fn is_machine_readable(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Csv)
    }
}

/// Render an audit outcome in the specified format
pub fn report(outcome: &AuditOutcome, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(outcome, fmt)
}

/// Render an audit outcome using an OutputFormat enum
pub fn report_with_format(outcome: &AuditOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(outcome),
        OutputFormat::Json => json::render(outcome),
        OutputFormat::Csv => csv::render(outcome),
        OutputFormat::Markdown => markdown::render(outcome),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Markdown => "md",
    }
}

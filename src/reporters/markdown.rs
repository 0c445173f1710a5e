//! Markdown reporter for the human-readable issue report
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - Documentation dashboards committed next to the docs
//!
//! Categories without entries are left out. Long categories are cut off
//! after `MAX_ENTRIES_PER_CATEGORY` entries with a count of the rest.

use crate::models::{IssueReport, RepoMetrics};
use crate::pipeline::AuditOutcome;
use anyhow::Result;
use std::fmt::Write;

const MAX_ENTRIES_PER_CATEGORY: usize = 200;

/// Render report as GitHub-flavored Markdown
pub fn render(outcome: &AuditOutcome) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(&outcome.repo));
    md.push('\n');

    md.push_str(&render_summary(&outcome.repo, &outcome.issues));
    md.push('\n');

    if outcome.issues.is_empty() {
        md.push_str("No issues found.\n");
    } else {
        md.push_str(&render_details(&outcome.issues)?);
    }

    Ok(md)
}

fn render_header(repo: &RepoMetrics) -> String {
    format!(
        r#"# Documentation Audit Report

Generated: {}
Root: `{}`
"#,
        repo.generated_at, repo.root
    )
}

fn render_summary(repo: &RepoMetrics, issues: &IssueReport) -> String {
    let mut out = String::from(
        "## Summary\n\n| Metric | Value |\n|--------|-------|\n",
    );
    let rows: [(&str, String); 8] = [
        ("Files analyzed", repo.files_analyzed.to_string()),
        ("Files skipped", repo.files_skipped.to_string()),
        ("Total words", repo.total_words.to_string()),
        ("Estimated tokens", repo.total_tokens_est.to_string()),
        ("Files with front matter", repo.files_with_front_matter.to_string()),
        (
            "Avg front-matter completeness",
            format!("{:.1}%", repo.avg_front_matter_completeness_pct),
        ),
        ("Internal links", repo.total_links_internal.to_string()),
        ("Total issues", issues.total().to_string()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("| {} | {} |\n", label, value));
    }

    out.push_str("\n| Category | Count |\n|----------|-------|\n");
    for (category, count) in issues.counts() {
        out.push_str(&format!("| {} | {} |\n", title(category), count));
    }
    out
}

fn render_details(issues: &IssueReport) -> Result<String> {
    let mut md = String::new();

    section(
        &mut md,
        "broken_internal_links",
        issues
            .broken_internal_links
            .iter()
            .map(|b| format!("`{}`: `{}` (looked for `{}`)", b.source, b.link, b.target)),
    )?;
    section(&mut md, "orphans", paths(&issues.orphans))?;
    section(&mut md, "dead_ends", paths(&issues.dead_ends))?;
    section(&mut md, "needs_related_links", paths(&issues.needs_related_links))?;
    section(&mut md, "missing_front_matter", paths(&issues.missing_front_matter))?;
    section(
        &mut md,
        "missing_required_keys",
        issues
            .missing_required_keys
            .iter()
            .map(|k| format!("`{}`: {}", k.file, k.keys.join(", "))),
    )?;
    section(
        &mut md,
        "front_matter_nudges",
        issues
            .front_matter_nudges
            .iter()
            .map(|k| format!("`{}`: consider {}", k.file, k.keys.join(", "))),
    )?;
    section(
        &mut md,
        "stale_files",
        issues
            .stale_files
            .iter()
            .map(|s| format!("`{}` (last commit {})", s.file, s.last_commit)),
    )?;
    section(
        &mut md,
        "similarity_clusters",
        issues.similarity_clusters.iter().map(|cluster| {
            cluster
                .iter()
                .map(|p| format!("`{}`", p))
                .collect::<Vec<_>>()
                .join(", ")
        }),
    )?;
    section(
        &mut md,
        "images_missing_alt",
        issues
            .images_missing_alt
            .iter()
            .map(|c| format!("`{}`: {} image(s)", c.file, c.count)),
    )?;
    section(
        &mut md,
        "code_blocks_missing_language",
        issues
            .code_blocks_missing_language
            .iter()
            .map(|c| format!("`{}`: {} block(s)", c.file, c.count)),
    )?;
    section(&mut md, "unclosed_code_fences", paths(&issues.unclosed_code_fences))?;
    section(
        &mut md,
        "semantic_numbering_violations",
        issues
            .semantic_numbering_violations
            .iter()
            .map(|c| format!("`{}`: {}% conformant", c.file, c.conformance_pct)),
    )?;

    Ok(md)
}

fn paths(list: &[String]) -> impl Iterator<Item = String> + '_ {
    list.iter().map(|p| format!("`{}`", p))
}

/// Append one category as a bullet list; empty categories are skipped
fn section(md: &mut String, category: &str, entries: impl Iterator<Item = String>) -> Result<()> {
    let entries: Vec<String> = entries.collect();
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(md, "## {} ({})\n", title(category), entries.len())?;
    for entry in entries.iter().take(MAX_ENTRIES_PER_CATEGORY) {
        writeln!(md, "- {}", entry)?;
    }
    let remaining = entries.len().saturating_sub(MAX_ENTRIES_PER_CATEGORY);
    if remaining > 0 {
        writeln!(md, "- ...and {} more", remaining)?;
    }
    md.push('\n');
    Ok(())
}

/// `missing_front_matter` -> `Missing front matter`
fn title(category: &str) -> String {
    let spaced = category.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

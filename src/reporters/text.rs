//! Text (terminal) reporter with colors and formatting

use crate::models::{IssueReport, RepoMetrics};
use crate::pipeline::AuditOutcome;
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";

/// Entries listed per category before eliding the rest
const MAX_LISTED: usize = 5;

/// Categories that point at something actually wrong, as opposed to nudges
fn is_error_category(category: &str) -> bool {
    matches!(
        category,
        "broken_internal_links" | "unclosed_code_fences" | "missing_required_keys"
    )
}

/// Render report as formatted terminal output
pub fn render(outcome: &AuditOutcome) -> Result<String> {
    let repo = &outcome.repo;
    let issues = &outcome.issues;
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Documentation Audit{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&render_totals(repo));

    let total = issues.total();
    out.push_str(&format!("{BOLD}ISSUES{RESET} ({} total)\n", total));
    if total == 0 {
        out.push_str(&format!("  {GREEN}No issues found{RESET}\n\n"));
        return Ok(out);
    }

    for (category, count) in issues.counts() {
        if count == 0 {
            continue;
        }
        let color = if is_error_category(category) { RED } else { YELLOW };
        out.push_str(&format!(
            "  {color}{:>4}{RESET}  {}\n",
            count,
            category.replace('_', " ")
        ));
    }
    out.push('\n');

    out.push_str(&render_highlights(issues));

    out.push_str(&format!(
        "{DIM}Tip: use --format markdown for the full issue list, or --format csv for per-file metrics{RESET}\n"
    ));

    Ok(out)
}

fn render_totals(repo: &RepoMetrics) -> String {
    let mut out = format!(
        "Files: {}  Words: {}  Tokens: ~{}  Links: {} internal / {} external\n",
        repo.files_analyzed,
        repo.total_words,
        repo.total_tokens_est,
        repo.total_links_internal,
        repo.total_links_external
    );
    if repo.files_skipped > 0 {
        out.push_str(&format!(
            "{YELLOW}Skipped {} unreadable file(s){RESET}\n",
            repo.files_skipped
        ));
    }
    out.push_str(&format!(
        "Front matter: {}/{} files, {:.1}% complete on average\n",
        repo.files_with_front_matter, repo.files_analyzed, repo.avg_front_matter_completeness_pct
    ));
    if !repo.git_enabled {
        out.push_str(&format!("{DIM}Version control: not available{RESET}\n"));
    }
    out.push('\n');
    out
}

/// Short listing of the categories readers usually act on first
fn render_highlights(issues: &IssueReport) -> String {
    let mut out = String::new();

    if !issues.broken_internal_links.is_empty() {
        out.push_str(&format!("{BOLD}BROKEN LINKS{RESET}\n"));
        for broken in issues.broken_internal_links.iter().take(MAX_LISTED) {
            out.push_str(&format!(
                "  {}  {DIM}->{RESET} {}\n",
                broken.source, broken.link
            ));
        }
        out.push_str(&more(issues.broken_internal_links.len()));
        out.push('\n');
    }

    if !issues.orphans.is_empty() {
        out.push_str(&format!("{BOLD}ORPHANS{RESET}\n"));
        for path in issues.orphans.iter().take(MAX_LISTED) {
            out.push_str(&format!("  {}\n", path));
        }
        out.push_str(&more(issues.orphans.len()));
        out.push('\n');
    }

    if !issues.unclosed_code_fences.is_empty() {
        out.push_str(&format!("{BOLD}UNCLOSED CODE FENCES{RESET}\n"));
        for path in issues.unclosed_code_fences.iter().take(MAX_LISTED) {
            out.push_str(&format!("  {}\n", path));
        }
        out.push_str(&more(issues.unclosed_code_fences.len()));
        out.push('\n');
    }

    out
}

fn more(len: usize) -> String {
    if len > MAX_LISTED {
        format!("  {DIM}...and {} more{RESET}\n", len - MAX_LISTED)
    } else {
        String::new()
    }
}

//! JSON reporter
//!
//! Repository metrics with the full issue report nested under `issues`.
//! Useful for machine consumption, piping to jq, or diffing between runs.

use crate::models::{IssueReport, RepoMetrics};
use crate::pipeline::AuditOutcome;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    repo: &'a RepoMetrics,
    issues: &'a IssueReport,
}

/// Render report as JSON
pub fn render(outcome: &AuditOutcome) -> Result<String> {
    let report = JsonReport {
        repo: &outcome.repo,
        issues: &outcome.issues,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_outcome;

    #[test]
    fn test_json_render_valid() {
        let outcome = test_outcome();
        let json_str = render(&outcome).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        assert_eq!(parsed["files_analyzed"], 3);
        assert_eq!(parsed["files_skipped"], 1);
        assert_eq!(parsed["generated_at"], "2024-05-01T12:30:00Z");
        assert_eq!(parsed["issues"]["orphans"][0], "orphan.md");
        assert_eq!(parsed["issues"]["broken_internal_links"][0]["source"], "docs/guide.md");
        assert_eq!(parsed["issues"]["broken_internal_links"][0]["target"], "docs/missing.md");
        assert_eq!(parsed["issue_counts"]["orphans"], 1);
    }

    #[test]
    fn test_json_lists_every_category() {
        let outcome = test_outcome();
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&outcome).expect("render JSON")).expect("parse JSON");
        let issues = parsed["issues"].as_object().expect("issues object");
        for key in outcome.issues.counts().keys() {
            assert!(issues.contains_key(*key), "missing {key}");
        }
    }
}

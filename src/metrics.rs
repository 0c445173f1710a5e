//! Per-file and repository-wide metrics

use crate::frontmatter::FrontMatterReport;
use crate::git::FileHistory;
use crate::graph::LinkGraph;
use crate::models::{DocumentRecord, FileMetrics, IssueReport, LinkKind, RepoMetrics};
use crate::scanner::semantic_conformance;
use chrono::{DateTime, SecondsFormat, Utc};

/// Flatten one document into a metrics row
pub fn file_metrics(
    record: &DocumentRecord,
    graph: &LinkGraph,
    front_matter: &FrontMatterReport,
    history: Option<&FileHistory>,
    stale: bool,
) -> FileMetrics {
    let history = history.cloned().unwrap_or_default();
    let s = &record.structure;

    FileMetrics {
        file: record.path.clone(),
        directory: record.directory.clone(),
        size_bytes: record.size_bytes,
        words: record.text.words,
        lines: record.text.lines,
        chars: record.text.chars,
        tokens_est: record.text.tokens_est,
        headings: s.headings,
        max_heading_depth: s.max_heading_depth,
        images: s.images,
        images_missing_alt: s.images_missing_alt,
        tables_rows: s.table_rows,
        code_blocks: s.code_blocks,
        code_blocks_missing_language: s.code_blocks_missing_language,
        links_total: record.links.len(),
        links_internal: record.count_links(LinkKind::Internal),
        links_external: record.count_links(LinkKind::External),
        links_broken: graph.broken_count(&record.path),
        front_matter_present: record.front_matter_present,
        front_matter_completeness_pct: front_matter.completeness_pct,
        front_matter_missing_keys: front_matter.missing_required.clone(),
        front_matter_suggested_keys_missing: front_matter.missing_suggested.clone(),
        front_matter_status: record.front_matter.get("status").cloned(),
        front_matter_type: record.front_matter.get("type").cloned(),
        semantic_headings_count: record.semantic_headings.len(),
        semantic_conformance_pct: semantic_conformance(&record.semantic_headings),
        commit_count: history.commit_count,
        last_commit_iso: history.last_commit,
        stale,
        simhash: record.fingerprint,
    }
}

/// Repository-wide totals and averages
pub struct RepoSummary<'a> {
    pub root: &'a str,
    pub files: &'a [FileMetrics],
    pub files_skipped: usize,
    pub issues: &'a IssueReport,
    pub git_enabled: bool,
    pub generated_at: DateTime<Utc>,
}

pub fn repo_metrics(summary: RepoSummary<'_>) -> RepoMetrics {
    let files = summary.files;
    let n = files.len();
    let avg = |total: f64| if n == 0 { 0.0 } else { round2(total / n as f64) };

    let total_words: usize = files.iter().map(|f| f.words).sum();
    let completeness: f64 = files
        .iter()
        .map(|f| f64::from(f.front_matter_completeness_pct))
        .sum();

    RepoMetrics {
        generated_at: summary
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        root: summary.root.to_string(),
        files_analyzed: n,
        files_skipped: summary.files_skipped,
        total_words,
        total_tokens_est: files.iter().map(|f| f.tokens_est).sum(),
        total_lines: files.iter().map(|f| f.lines).sum(),
        total_chars: files.iter().map(|f| f.chars).sum(),
        total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
        avg_words_per_file: avg(total_words as f64),
        files_with_front_matter: files.iter().filter(|f| f.front_matter_present).count(),
        avg_front_matter_completeness_pct: avg(completeness),
        total_links_internal: files.iter().map(|f| f.links_internal).sum(),
        total_links_external: files.iter().map(|f| f.links_external).sum(),
        total_broken_links: summary.issues.broken_internal_links.len(),
        total_images: files.iter().map(|f| f.images).sum(),
        total_code_blocks: files.iter().map(|f| f.code_blocks).sum(),
        git_enabled: summary.git_enabled,
        issue_counts: summary
            .issues
            .counts()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

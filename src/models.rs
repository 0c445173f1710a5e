//! Core data models for docaudit
//!
//! These models flow through the whole run: the scanner produces
//! `DocumentRecord`s, later stages derive issues and metrics from them, and
//! the reporters serialize the results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a raw link target is classified before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Absolute URI (`https://`, `mailto:`, ...)
    External,
    /// In-page anchor (`#section`)
    Anchor,
    /// Document-relative path, candidate for resolution
    Internal,
}

impl LinkKind {
    /// Classify a cleaned link target.
    ///
    /// `#...` is an anchor. Anything with a URI scheme of two or more
    /// characters (`https:`, `mailto:`, `tel:`) or a protocol-relative `//`
    /// prefix is external. Single-letter schemes are treated as Windows
    /// drive letters and stay internal.
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with('#') {
            return LinkKind::Anchor;
        }
        if raw.starts_with("//") || has_uri_scheme(raw) {
            return LinkKind::External;
        }
        LinkKind::Internal
    }
}

fn has_uri_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    scheme.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::External => write!(f, "external"),
            LinkKind::Anchor => write!(f, "anchor"),
            LinkKind::Internal => write!(f, "internal"),
        }
    }
}

/// A link as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub raw: String,
    pub kind: LinkKind,
}

/// Numbered section heading, e.g. `## **3. Usage**`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticHeading {
    pub number: u64,
    pub title: String,
}

/// Plain text volume metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub words: usize,
    pub lines: usize,
    pub chars: usize,
    pub tokens_est: u64,
}

/// Structural signals counted by the scanner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralCounts {
    pub headings: usize,
    /// Deepest heading level seen (0 when there are no headings, max 6)
    pub max_heading_depth: u8,
    pub code_blocks: usize,
    pub code_blocks_missing_language: usize,
    /// An opening fence was never closed; it is not counted as a block
    pub unclosed_fence: bool,
    pub images: usize,
    pub images_missing_alt: usize,
    pub table_rows: usize,
}

/// Everything extracted from one document in a single scan.
///
/// Records are value types: built once by the scanner and never mutated.
/// Link resolution depends on the whole corpus and lives in the link graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Repo-relative path with forward slashes; unique across the corpus
    pub path: String,
    pub directory: String,
    pub size_bytes: u64,
    /// Decoded content after truncation
    #[serde(skip)]
    pub raw_text: String,
    pub text: TextMetrics,
    pub structure: StructuralCounts,
    pub links: Vec<Link>,
    pub front_matter_present: bool,
    pub front_matter: IndexMap<String, String>,
    pub semantic_headings: Vec<SemanticHeading>,
    pub fingerprint: u64,
}

impl DocumentRecord {
    /// File name component of the path
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn links_of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.kind == kind)
    }

    pub fn count_links(&self, kind: LinkKind) -> usize {
        self.links_of_kind(kind).count()
    }
}

// ============================================================================
// Issues
// ============================================================================

/// A link whose target could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrokenLink {
    pub source: String,
    /// Link text exactly as written
    pub link: String,
    /// Normalized repo-relative path that was looked up
    pub target: String,
}

/// File plus a list of front-matter keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyIssue {
    pub file: String,
    pub keys: Vec<String>,
}

/// File plus a count of offending constructs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountIssue {
    pub file: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleFile {
    pub file: String,
    pub last_commit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceIssue {
    pub file: String,
    pub conformance_pct: u8,
}

/// Cross-file issue report handed to the reporters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub broken_internal_links: Vec<BrokenLink>,
    pub orphans: Vec<String>,
    pub dead_ends: Vec<String>,
    pub needs_related_links: Vec<String>,
    pub missing_front_matter: Vec<String>,
    pub missing_required_keys: Vec<KeyIssue>,
    pub front_matter_nudges: Vec<KeyIssue>,
    pub stale_files: Vec<StaleFile>,
    pub similarity_clusters: Vec<Vec<String>>,
    pub images_missing_alt: Vec<CountIssue>,
    pub code_blocks_missing_language: Vec<CountIssue>,
    pub unclosed_code_fences: Vec<String>,
    pub semantic_numbering_violations: Vec<ConformanceIssue>,
}

impl IssueReport {
    /// Entry count per category, keyed by the JSON field name
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("broken_internal_links", self.broken_internal_links.len()),
            ("orphans", self.orphans.len()),
            ("dead_ends", self.dead_ends.len()),
            ("needs_related_links", self.needs_related_links.len()),
            ("missing_front_matter", self.missing_front_matter.len()),
            ("missing_required_keys", self.missing_required_keys.len()),
            ("front_matter_nudges", self.front_matter_nudges.len()),
            ("stale_files", self.stale_files.len()),
            ("similarity_clusters", self.similarity_clusters.len()),
            ("images_missing_alt", self.images_missing_alt.len()),
            (
                "code_blocks_missing_language",
                self.code_blocks_missing_language.len(),
            ),
            ("unclosed_code_fences", self.unclosed_code_fences.len()),
            (
                "semantic_numbering_violations",
                self.semantic_numbering_violations.len(),
            ),
        ])
    }

    pub fn total(&self) -> usize {
        self.counts().values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// One row of the per-file metrics table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file: String,
    pub directory: String,
    pub size_bytes: u64,
    pub words: usize,
    pub lines: usize,
    pub chars: usize,
    pub tokens_est: u64,
    pub headings: usize,
    pub max_heading_depth: u8,
    pub images: usize,
    pub images_missing_alt: usize,
    pub tables_rows: usize,
    pub code_blocks: usize,
    pub code_blocks_missing_language: usize,
    pub links_total: usize,
    pub links_internal: usize,
    pub links_external: usize,
    pub links_broken: usize,
    pub front_matter_present: bool,
    pub front_matter_completeness_pct: u8,
    pub front_matter_missing_keys: Vec<String>,
    pub front_matter_suggested_keys_missing: Vec<String>,
    pub front_matter_status: Option<String>,
    pub front_matter_type: Option<String>,
    pub semantic_headings_count: usize,
    pub semantic_conformance_pct: u8,
    pub commit_count: u32,
    pub last_commit_iso: String,
    pub stale: bool,
    pub simhash: u64,
}

/// Repository-wide aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub generated_at: String,
    pub root: String,
    pub files_analyzed: usize,
    pub files_skipped: usize,
    pub total_words: usize,
    pub total_tokens_est: u64,
    pub total_lines: usize,
    pub total_chars: usize,
    pub total_size_bytes: u64,
    pub avg_words_per_file: f64,
    pub files_with_front_matter: usize,
    pub avg_front_matter_completeness_pct: f64,
    pub total_links_internal: usize,
    pub total_links_external: usize,
    pub total_broken_links: usize,
    pub total_images: usize,
    pub total_code_blocks: usize,
    pub git_enabled: bool,
    pub issue_counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_report_total() {
        let mut report = IssueReport::default();
        assert!(report.is_empty());

        report.orphans.push("a.md".into());
        report.dead_ends.push("a.md".into());
        report.similarity_clusters.push(vec!["a.md".into(), "b.md".into()]);
        assert_eq!(report.total(), 3);
        assert_eq!(report.counts()["orphans"], 1);
        assert_eq!(report.counts()["similarity_clusters"], 1);
    }

    #[test]
    fn test_link_classification() {
        assert_eq!(LinkKind::classify("#intro"), LinkKind::Anchor);
        assert_eq!(LinkKind::classify("https://x.org/a"), LinkKind::External);
        assert_eq!(LinkKind::classify("mailto:me@x.org"), LinkKind::External);
        assert_eq!(LinkKind::classify("tel:+15550100"), LinkKind::External);
        assert_eq!(LinkKind::classify("//cdn.x.org/a.js"), LinkKind::External);
        assert_eq!(LinkKind::classify("guide.md"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("../a/b.md#top"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("C:/docs/a.md"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("notes:v2.md"), LinkKind::External);
    }

    #[test]
    fn test_link_kind_serializes_lowercase() {
        let json = serde_json::to_string(&LinkKind::Anchor).expect("serialize");
        assert_eq!(json, "\"anchor\"");
    }
}

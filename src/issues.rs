//! Issue aggregation
//!
//! Pure merge of the per-document checks and the corpus-wide stages into one
//! `IssueReport`. Every list is ordered by path so reports diff cleanly
//! between runs.

use crate::frontmatter::FrontMatterReport;
use crate::graph::GraphAudit;
use crate::models::{ConformanceIssue, CountIssue, DocumentRecord, IssueReport, KeyIssue, StaleFile};
use crate::scanner::semantic_conformance;
use std::collections::BTreeMap;

/// Decides which documents are navigation pages.
///
/// Index pages are expected to be leaves of the link graph and are not asked
/// to link onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPolicy {
    /// Lowercased file names
    names: Vec<String>,
}

impl IndexPolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Whether the file name of `path` is an index page name
    pub fn is_index(&self, path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        self.names.iter().any(|n| *n == name)
    }
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INDEX_FILES)
    }
}

/// Everything the aggregator merges
pub struct AggregateInput<'a> {
    pub records: &'a [DocumentRecord],
    pub graph_audit: &'a GraphAudit,
    /// Keyed by document path
    pub front_matter: &'a BTreeMap<String, FrontMatterReport>,
    pub clusters: Vec<Vec<String>>,
    pub stale_files: Vec<StaleFile>,
    pub index_policy: &'a IndexPolicy,
}

/// Build the issue report
pub fn aggregate(input: AggregateInput<'_>) -> IssueReport {
    let mut report = IssueReport {
        broken_internal_links: input.graph_audit.broken_links.clone(),
        orphans: input.graph_audit.orphans.clone(),
        dead_ends: input.graph_audit.dead_ends.clone(),
        similarity_clusters: input.clusters,
        stale_files: input.stale_files,
        ..Default::default()
    };

    report.needs_related_links = report
        .dead_ends
        .iter()
        .filter(|path| !input.index_policy.is_index(path))
        .cloned()
        .collect();

    let mut records: Vec<&DocumentRecord> = input.records.iter().collect();
    records.sort_by(|a, b| a.path.cmp(&b.path));

    for record in records {
        let file = &record.path;

        match input.front_matter.get(file) {
            Some(fm) => {
                if !fm.present {
                    report.missing_front_matter.push(file.clone());
                }
                if !fm.missing_required.is_empty() {
                    report.missing_required_keys.push(KeyIssue {
                        file: file.clone(),
                        keys: fm.missing_required.clone(),
                    });
                }
                if fm.present && !fm.missing_suggested.is_empty() {
                    report.front_matter_nudges.push(KeyIssue {
                        file: file.clone(),
                        keys: fm.missing_suggested.clone(),
                    });
                }
            }
            None if !record.front_matter_present => {
                report.missing_front_matter.push(file.clone());
            }
            None => {}
        }

        let s = &record.structure;
        if s.images_missing_alt > 0 {
            report.images_missing_alt.push(CountIssue {
                file: file.clone(),
                count: s.images_missing_alt,
            });
        }
        if s.code_blocks_missing_language > 0 {
            report.code_blocks_missing_language.push(CountIssue {
                file: file.clone(),
                count: s.code_blocks_missing_language,
            });
        }
        if s.unclosed_fence {
            report.unclosed_code_fences.push(file.clone());
        }

        let conformance = semantic_conformance(&record.semantic_headings);
        if conformance < 100 {
            report.semantic_numbering_violations.push(ConformanceIssue {
                file: file.clone(),
                conformance_pct: conformance,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontMatterSchema;
    use crate::scanner::{Patterns, ScanOptions, Scanner};

    fn scan(docs: &[(&str, &str)]) -> Vec<DocumentRecord> {
        let scanner = Scanner::new(
            Patterns::compile().expect("patterns compile"),
            ScanOptions::default(),
        );
        docs.iter()
            .map(|(path, text)| scanner.scan(path, text.as_bytes()))
            .collect()
    }

    fn reports(records: &[DocumentRecord]) -> BTreeMap<String, FrontMatterReport> {
        let schema = FrontMatterSchema::default();
        records
            .iter()
            .map(|r| {
                (
                    r.path.clone(),
                    schema.validate(&r.front_matter, r.front_matter_present),
                )
            })
            .collect()
    }

    #[test]
    fn test_index_policy_case_insensitive() {
        let policy = IndexPolicy::default();
        assert!(policy.is_index("README.md"));
        assert!(policy.is_index("docs/readme.MD"));
        assert!(!policy.is_index("docs/README.md.bak"));
        assert!(!policy.is_index("docs/NOT_README.md"));

        let custom = IndexPolicy::new(["index.md", " Home.md "]);
        assert!(custom.is_index("site/home.md"));
        assert!(!custom.is_index("README.md"));
    }

    #[test]
    fn test_needs_related_links_skips_index_pages() {
        let audit = GraphAudit {
            dead_ends: vec!["README.md".into(), "docs/Readme.md".into(), "docs/a.md".into()],
            ..Default::default()
        };
        let report = aggregate(AggregateInput {
            records: &[],
            graph_audit: &audit,
            front_matter: &BTreeMap::new(),
            clusters: Vec::new(),
            stale_files: Vec::new(),
            index_policy: &IndexPolicy::default(),
        });
        assert_eq!(report.dead_ends.len(), 3);
        assert_eq!(report.needs_related_links, vec!["docs/a.md"]);
    }

    #[test]
    fn test_per_file_issues() {
        let records = scan(&[
            (
                "b.md",
                "---\nstatus: ok\ntype: guide\nowner: me\nlastReviewed: 2024-01-01\n---\n## **1. A**\n## **2. B**\n## **3. C**\n",
            ),
            ("a.md", "# No front matter\n![](x.png)\n```\ncode\n```\n```rust\nopen"),
            ("c.md", "---\nstatus: draft\n---\n"),
        ]);
        let fm = reports(&records);
        let report = aggregate(AggregateInput {
            records: &records,
            graph_audit: &GraphAudit::default(),
            front_matter: &fm,
            clusters: vec![vec!["a.md".into(), "c.md".into()]],
            stale_files: vec![StaleFile {
                file: "c.md".into(),
                last_commit: "2020-01-01T00:00:00Z".into(),
            }],
            index_policy: &IndexPolicy::default(),
        });

        assert_eq!(report.missing_front_matter, vec!["a.md"]);
        let required: Vec<&str> = report
            .missing_required_keys
            .iter()
            .map(|k| k.file.as_str())
            .collect();
        assert_eq!(required, vec!["a.md", "c.md"]);
        assert_eq!(report.missing_required_keys[1].keys, vec!["type", "owner", "lastReviewed"]);

        // nudges only for files that have front matter
        let nudged: Vec<&str> = report
            .front_matter_nudges
            .iter()
            .map(|k| k.file.as_str())
            .collect();
        assert_eq!(nudged, vec!["b.md", "c.md"]);

        assert_eq!(report.images_missing_alt, vec![CountIssue { file: "a.md".into(), count: 1 }]);
        assert_eq!(
            report.code_blocks_missing_language,
            vec![CountIssue { file: "a.md".into(), count: 1 }]
        );
        assert_eq!(report.unclosed_code_fences, vec!["a.md"]);

        let semantic: Vec<(&str, u8)> = report
            .semantic_numbering_violations
            .iter()
            .map(|c| (c.file.as_str(), c.conformance_pct))
            .collect();
        assert_eq!(semantic, vec![("a.md", 0), ("c.md", 0)]);

        assert_eq!(report.similarity_clusters.len(), 1);
        assert_eq!(report.stale_files.len(), 1);
    }
}

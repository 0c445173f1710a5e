//! Inter-document link graph
//!
//! Nodes are corpus paths. Edges are internal links that resolved, keyed by
//! the linking document. Broken links are kept alongside in `resolutions`
//! so the auditor can report them with the link text as written.

pub mod audit;
pub mod resolve;

pub use audit::{audit, GraphAudit};
pub use resolve::{resolve, CorpusIndex, FilesystemIndex, Resolution, TargetIndex};

use crate::models::{DocumentRecord, LinkKind};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One internal link of a document and its resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub raw: String,
    pub outcome: Resolution,
}

#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    pub nodes: BTreeSet<String>,
    /// source -> resolved targets, first-occurrence order, no duplicates
    pub edges: BTreeMap<String, Vec<String>>,
    /// Corpus paths linked to by some other document
    pub inbound: BTreeSet<String>,
    /// source -> every internal link in document order
    pub resolutions: BTreeMap<String, Vec<ResolvedLink>>,
}

impl LinkGraph {
    /// Resolve every internal link in the corpus.
    ///
    /// Needs the complete set of records; resolution of each document runs
    /// in parallel since it only reads the index.
    pub fn build(records: &[DocumentRecord], index: &dyn TargetIndex) -> Self {
        let nodes: BTreeSet<String> = records.iter().map(|r| r.path.clone()).collect();

        let per_source: Vec<(String, Vec<ResolvedLink>)> = records
            .par_iter()
            .map(|record| {
                let links = record
                    .links_of_kind(LinkKind::Internal)
                    .filter_map(|link| match resolve(&record.path, &link.raw, index) {
                        Resolution::Excluded => None,
                        outcome => Some(ResolvedLink {
                            raw: link.raw.clone(),
                            outcome,
                        }),
                    })
                    .collect();
                (record.path.clone(), links)
            })
            .collect();

        let mut graph = LinkGraph {
            nodes,
            ..Default::default()
        };

        for (source, links) in per_source {
            let mut targets: Vec<String> = Vec::new();
            for link in &links {
                if let Resolution::Resolved(target) = &link.outcome {
                    if !targets.contains(target) {
                        targets.push(target.clone());
                    }
                }
            }
            for target in &targets {
                if target != &source && graph.nodes.contains(target) {
                    graph.inbound.insert(target.clone());
                }
            }
            graph.edges.insert(source.clone(), targets);
            graph.resolutions.insert(source, links);
        }

        debug!(
            "Link graph: {} nodes, {} edges, {} linked-to",
            graph.nodes.len(),
            graph.edge_count(),
            graph.inbound.len()
        );
        graph
    }

    /// Resolved targets of `source`
    pub fn outbound(&self, source: &str) -> &[String] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Broken links of `source` as `(raw, target)` in document order. The
    /// same link written twice in one document appears once.
    pub fn broken_links(&self, source: &str) -> Vec<(&str, &str)> {
        let mut broken: Vec<(&str, &str)> = Vec::new();
        for link in self.resolutions.get(source).into_iter().flatten() {
            if let Resolution::Broken(target) = &link.outcome {
                let pair = (link.raw.as_str(), target.as_str());
                if !broken.contains(&pair) {
                    broken.push(pair);
                }
            }
        }
        broken
    }

    /// Distinct broken links of `source`
    pub fn broken_count(&self, source: &str) -> usize {
        self.broken_links(source).len()
    }
}

//! Graph consistency checks: orphans, dead ends and broken links

use super::LinkGraph;
use crate::models::BrokenLink;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAudit {
    /// Documents no other document links to
    pub orphans: Vec<String>,
    /// Documents without a single resolved internal link
    pub dead_ends: Vec<String>,
    /// Failed resolutions, by source then document order
    pub broken_links: Vec<BrokenLink>,
}

/// Audit a built graph. All lists come out in path order.
///
/// A self-link is an edge but never counts as inbound, so a document that
/// only links to itself is an orphan. A document whose internal links are
/// all broken is still a dead end.
pub fn audit(graph: &LinkGraph) -> GraphAudit {
    let orphans = graph
        .nodes
        .iter()
        .filter(|node| !graph.inbound.contains(*node))
        .cloned()
        .collect();

    let dead_ends = graph
        .nodes
        .iter()
        .filter(|node| graph.outbound(node).is_empty())
        .cloned()
        .collect();

    let broken_links = graph
        .resolutions
        .keys()
        .flat_map(|source| {
            graph
                .broken_links(source)
                .into_iter()
                .map(move |(link, target)| BrokenLink {
                    source: source.clone(),
                    link: link.to_string(),
                    target: target.to_string(),
                })
        })
        .collect();

    GraphAudit {
        orphans,
        dead_ends,
        broken_links,
    }
}

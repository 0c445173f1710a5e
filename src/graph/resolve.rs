//! Tolerant link resolution
//!
//! A link is resolved against the directory of the document it appears in.
//! Links that leave out the file extension or point at a directory are
//! retried as `<path>.md` and `<path>/README.md` before being reported as
//! broken.

use crate::models::{DocumentRecord, LinkKind};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// File appended when a link points at a directory
pub const DIRECTORY_INDEX: &str = "README.md";

/// Outcome of resolving one raw link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// External URI, pure anchor or empty path; not part of the graph
    Excluded,
    /// Repo-relative path of the first candidate that exists
    Resolved(String),
    /// No candidate exists; carries the literal normalized path
    Broken(String),
}

impl Resolution {
    pub fn is_broken(&self) -> bool {
        matches!(self, Resolution::Broken(_))
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(t) | Resolution::Broken(t) => Some(t),
            Resolution::Excluded => None,
        }
    }
}

/// Decides whether a repo-relative path exists
pub trait TargetIndex: Send + Sync {
    fn contains(&self, path: &str) -> bool;
}

/// Existence means membership in the scanned corpus
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    nodes: BTreeSet<String>,
}

impl CorpusIndex {
    pub fn new(nodes: BTreeSet<String>) -> Self {
        Self { nodes }
    }

    pub fn from_records(records: &[DocumentRecord]) -> Self {
        Self::new(records.iter().map(|r| r.path.clone()).collect())
    }
}

impl TargetIndex for CorpusIndex {
    fn contains(&self, path: &str) -> bool {
        self.nodes.contains(path)
    }
}

/// Corpus membership, falling back to a file check under the repo root.
///
/// Lets links to non-document files (images, scripts, excluded extensions)
/// resolve instead of being reported broken.
#[derive(Debug, Clone)]
pub struct FilesystemIndex {
    corpus: CorpusIndex,
    root: PathBuf,
}

impl FilesystemIndex {
    pub fn new(corpus: CorpusIndex, root: impl Into<PathBuf>) -> Self {
        Self {
            corpus,
            root: root.into(),
        }
    }
}

impl TargetIndex for FilesystemIndex {
    fn contains(&self, path: &str) -> bool {
        if self.corpus.contains(path) {
            return true;
        }
        // ".." past the root never names a file inside the repo
        if path.is_empty() || path.split('/').any(|seg| seg == "..") {
            return false;
        }
        self.root.join(path).is_file()
    }
}

/// Resolve `raw` as written in the document at `source`
pub fn resolve(source: &str, raw: &str, index: &dyn TargetIndex) -> Resolution {
    let raw = raw.trim();
    if raw.is_empty() || LinkKind::classify(raw) != LinkKind::Internal {
        return Resolution::Excluded;
    }

    let path_part = match raw.split_once('#') {
        Some((path, _)) => path,
        None => raw,
    };
    // Query strings never name a different file
    let path_part = match path_part.split_once('?') {
        Some((path, _)) => path,
        None => path_part,
    };
    let path_part = path_part.trim_end_matches('/');
    if path_part.is_empty() {
        return Resolution::Excluded;
    }

    let source_dir = match source.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };
    let literal = join_normalized(source_dir, path_part);

    for candidate in candidates(&literal) {
        if index.contains(&candidate) {
            return Resolution::Resolved(candidate);
        }
    }
    Resolution::Broken(literal)
}

/// Candidate paths in lookup order
fn candidates(literal: &str) -> Vec<String> {
    let mut out = vec![literal.to_string()];
    if !has_extension(literal) {
        out.push(format!("{literal}.md"));
        if literal.is_empty() {
            out.push(DIRECTORY_INDEX.to_string());
        } else {
            out.push(format!("{literal}/{DIRECTORY_INDEX}"));
        }
    }
    out
}

fn has_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => false,
        Some(idx) => idx + 1 < name.len(),
    }
}

/// Join `link` onto `base_dir` and fold `.` and `..` segments.
///
/// A leading `/` makes the link relative to the repo root. A `..` that would
/// climb above the root is kept, so the result can never match a corpus path.
pub fn join_normalized(base_dir: &str, link: &str) -> String {
    let (base, link) = match link.strip_prefix('/') {
        Some(rest) => ("", rest),
        None => (base_dir, link),
    };

    let mut parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for seg in link.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

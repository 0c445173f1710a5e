//! Version-control metadata
//!
//! The audit only needs two facts per document: how many commits touched it
//! and when the last one happened. Both come from a `VcsProvider`, so the
//! rest of the pipeline can be tested without a repository.
//!
//! Lookups never fail the run. A provider that cannot answer returns
//! `FileHistory::default()`, i.e. zero commits and an empty timestamp.
//!
//! # Example
//!
//! ```no_run
//! use docaudit::git::{open_provider, GitBackend};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let vcs = open_provider(Path::new("."), GitBackend::Cli, Duration::from_secs(10));
//! let history = vcs.file_history("README.md");
//! println!("{} commits, last {}", history.commit_count, history.last_commit);
//! ```

pub mod cli;
pub mod history;

pub use cli::GitCli;
pub use history::LibGit2;

use crate::models::StaleFile;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Commit metadata for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHistory {
    pub commit_count: u32,
    /// ISO-8601 timestamp of the latest commit, empty when unknown
    pub last_commit: String,
}

impl FileHistory {
    pub fn is_known(&self) -> bool {
        !self.last_commit.is_empty()
    }

    /// Whether the last commit is more than `stale_days` days before `now`
    pub fn is_stale(&self, stale_days: u32, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.last_commit) {
            Ok(ts) => (now - ts.with_timezone(&Utc)).num_days() > i64::from(stale_days),
            Err(_) => false,
        }
    }
}

/// Source of per-file commit metadata
pub trait VcsProvider: Send + Sync {
    /// Backend name for logs and reports
    fn name(&self) -> &'static str;

    /// History of `rel_path` (relative to the audited root, `/` separated)
    fn file_history(&self, rel_path: &str) -> FileHistory;

    fn enabled(&self) -> bool {
        true
    }
}

/// Provider used when history lookups are disabled or unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VcsProvider for NoVcs {
    fn name(&self) -> &'static str {
        "none"
    }

    fn file_history(&self, _rel_path: &str) -> FileHistory {
        FileHistory::default()
    }

    fn enabled(&self) -> bool {
        false
    }
}

/// Which git implementation answers history lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// Shell out to the `git` binary per file
    #[default]
    Cli,
    /// Walk history once in-process with libgit2
    #[serde(alias = "git2")]
    LibGit2,
}

impl FromStr for GitBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cli" | "git" => Ok(GitBackend::Cli),
            "libgit2" | "git2" => Ok(GitBackend::LibGit2),
            other => Err(format!("Unknown git backend: {other} (expected cli or libgit2)")),
        }
    }
}

impl fmt::Display for GitBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitBackend::Cli => write!(f, "cli"),
            GitBackend::LibGit2 => write!(f, "libgit2"),
        }
    }
}

/// Open the requested backend for `root`, or `NoVcs` if it is unavailable
pub fn open_provider(root: &Path, backend: GitBackend, timeout: Duration) -> Box<dyn VcsProvider> {
    match backend {
        GitBackend::Cli => match GitCli::detect(root, timeout) {
            Some(cli) => Box::new(cli),
            None => {
                warn!("git not available for {}; history metrics disabled", root.display());
                Box::new(NoVcs)
            }
        },
        GitBackend::LibGit2 => match LibGit2::open(root) {
            Ok(repo) => Box::new(repo),
            Err(e) => {
                warn!("Could not read git history: {e:#}; history metrics disabled");
                Box::new(NoVcs)
            }
        },
    }
}

/// Look up every path in parallel
pub fn collect_histories<'a, I>(provider: &dyn VcsProvider, paths: I) -> BTreeMap<String, FileHistory>
where
    I: IntoIterator<Item = &'a str>,
{
    if !provider.enabled() {
        return BTreeMap::new();
    }
    let paths: Vec<&str> = paths.into_iter().collect();
    let histories: BTreeMap<String, FileHistory> = paths
        .par_iter()
        .map(|path| (path.to_string(), provider.file_history(path)))
        .collect();
    debug!(
        "{} history: {} of {} files tracked",
        provider.name(),
        histories.values().filter(|h| h.is_known()).count(),
        histories.len()
    );
    histories
}

/// Files whose last commit is older than `stale_days`, in path order.
///
/// Files with no known history are never stale.
pub fn stale_files(
    histories: &BTreeMap<String, FileHistory>,
    stale_days: u32,
    now: DateTime<Utc>,
) -> Vec<StaleFile> {
    histories
        .iter()
        .filter(|(_, h)| h.is_stale(stale_days, now))
        .map(|(file, h)| StaleFile {
            file: file.clone(),
            last_commit: h.last_commit.clone(),
        })
        .collect()
}

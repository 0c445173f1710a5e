//! Git history extraction using libgit2
//!
//! Walks the history of HEAD once, newest first, and records for every path
//! how many commits changed it and when the newest of them was made. Lookups
//! afterwards are map reads, which makes this backend the faster choice for
//! large corpora.

use super::{FileHistory, VcsProvider};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{Repository, Sort};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-file history computed from one revwalk
#[derive(Debug, Default)]
pub struct LibGit2 {
    /// Keyed by path relative to the audited root
    files: HashMap<String, FileHistory>,
}

impl LibGit2 {
    /// Open the repository containing `root` and index its history.
    ///
    /// `root` may be a subdirectory of the work tree; paths outside it are
    /// dropped and the rest are re-keyed relative to `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let repo = Repository::discover(root)
            .with_context(|| format!("Failed to open git repository at {:?}", root))?;
        debug!("Opened git repository at {:?}", repo.path());

        let workdir = repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")?;
        let prefix = root_prefix(workdir, root)?;
        let files = index_history(&repo, &prefix)?;
        debug!("Indexed git history for {} paths", files.len());
        Ok(Self { files })
    }
}

impl VcsProvider for LibGit2 {
    fn name(&self) -> &'static str {
        "libgit2"
    }

    fn file_history(&self, rel_path: &str) -> FileHistory {
        self.files.get(rel_path).cloned().unwrap_or_default()
    }
}

/// `root` relative to the work tree, as a `/`-terminated prefix ("" at top)
fn root_prefix(workdir: &Path, root: &Path) -> Result<String> {
    let workdir: PathBuf = workdir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", workdir))?;
    let root: PathBuf = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", root))?;
    let rel = root
        .strip_prefix(&workdir)
        .with_context(|| format!("{:?} is not inside {:?}", root, workdir))?;

    let mut prefix = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if !prefix.is_empty() {
        prefix.push('/');
    }
    Ok(prefix)
}

fn index_history(repo: &Repository, prefix: &str) -> Result<HashMap<String, FileHistory>> {
    let mut files: HashMap<String, FileHistory> = HashMap::new();

    // Unborn HEAD: nothing committed yet
    if repo.head().is_err() {
        return Ok(files);
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    for oid_result in revwalk {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        let parent = commit.parent(0).ok();
        let tree = commit.tree()?;
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let timestamp = format_git_time(&commit.time());

        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path() else {
                continue;
            };
            let path = path.to_string_lossy().replace('\\', "/");
            let Some(rel) = path.strip_prefix(prefix) else {
                continue;
            };
            let entry = files.entry(rel.to_string()).or_default();
            entry.commit_count += 1;
            // Newest first, so the first commit seen is the latest
            if entry.last_commit.is_empty() {
                entry.last_commit = timestamp.clone();
            }
        }
    }

    Ok(files)
}

fn format_git_time(time: &git2::Time) -> String {
    match Utc.timestamp_opt(time.seconds(), 0).single() {
        Some(dt) => dt.to_rfc3339(),
        None => "1970-01-01T00:00:00Z".to_string(),
    }
}

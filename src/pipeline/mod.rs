//! Documentation audit pipeline
//!
//! Orchestrates a full run:
//! 1. Discover documents under the root
//! 2. Read and scan them in parallel
//! 3. Build the link graph and audit it (needs every record)
//! 4. Cluster fingerprints
//! 5. Look up version-control history
//! 6. Aggregate issues and metrics
//!
//! Stages are exposed individually so the CLI can report progress between
//! them; `Auditor::run` chains them for library callers.

mod discover;

pub use discover::{
    discover_documents, is_report_file, read_capped, relative_path, IGNORE_FILE_NAME, REPORT_STEMS,
};

use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::frontmatter::{FrontMatterReport, FrontMatterSchema};
use crate::git::{self, FileHistory, VcsProvider};
use crate::graph::{self, CorpusIndex, FilesystemIndex, GraphAudit, LinkGraph, TargetIndex};
use crate::issues::{self, AggregateInput, IndexPolicy};
use crate::metrics::{self, RepoSummary};
use crate::models::{DocumentRecord, FileMetrics, IssueReport, RepoMetrics};
use crate::scanner::{Patterns, Scanner};
use crate::similarity;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of the scan stage
#[derive(Debug, Default)]
pub struct ScanBatch {
    /// Sorted by path
    pub records: Vec<DocumentRecord>,
    /// Files that could not be read
    pub skipped: Vec<PathBuf>,
}

/// Everything a run produces
#[derive(Debug)]
pub struct AuditOutcome {
    pub records: Vec<DocumentRecord>,
    pub graph: LinkGraph,
    pub graph_audit: GraphAudit,
    pub front_matter: BTreeMap<String, FrontMatterReport>,
    pub histories: BTreeMap<String, FileHistory>,
    pub files: Vec<FileMetrics>,
    pub issues: IssueReport,
    pub repo: RepoMetrics,
}

/// Runs audits with one configuration
#[derive(Debug, Clone)]
pub struct Auditor {
    config: AuditConfig,
    scanner: Scanner,
    schema: FrontMatterSchema,
    index_policy: IndexPolicy,
    extensions: Vec<String>,
}

impl Auditor {
    /// Validate `config` and compile the scanner patterns
    pub fn new(config: AuditConfig) -> AuditResult<Self> {
        config.validate()?;
        let scanner = Scanner::new(Patterns::compile()?, config.scan.options());
        Ok(Self {
            schema: config.front_matter.schema(),
            index_policy: IndexPolicy::new(&config.links.index_files),
            extensions: config.scan.normalized_extensions(),
            scanner,
            config,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Stage 1: list documents under `root`
    pub fn discover(&self, root: &Path) -> AuditResult<Vec<PathBuf>> {
        discover_documents(root, &self.extensions, &self.config.scan.exclude_dirs)
    }

    /// Read and scan one file
    pub fn scan_file(&self, root: &Path, path: &Path) -> std::io::Result<DocumentRecord> {
        let (bytes, size) = read_capped(path, self.config.scan.max_bytes)?;
        Ok(self
            .scanner
            .scan_sized(&relative_path(root, path), &bytes, size))
    }

    /// Stage 2: scan `files` in parallel on the current rayon pool
    pub fn scan(&self, root: &Path, files: &[PathBuf]) -> ScanBatch {
        let results: Vec<Result<DocumentRecord, PathBuf>> = files
            .par_iter()
            .map(|path| {
                self.scan_file(root, path).map_err(|e| {
                    warn!("Skipping {}: {}", path.display(), e);
                    path.clone()
                })
            })
            .collect();
        collect_batch(results)
    }

    /// Stages 3-6 over a finished scan
    pub fn analyze(
        &self,
        root: &Path,
        batch: ScanBatch,
        vcs: &dyn VcsProvider,
        now: DateTime<Utc>,
    ) -> AuditResult<AuditOutcome> {
        let ScanBatch { records, skipped } = batch;
        if records.is_empty() {
            return Err(AuditError::NoDocuments {
                root: root.to_path_buf(),
                extensions: self.extensions.join(","),
            });
        }

        let graph = self.build_graph(root, &records);
        let graph_audit = graph::audit(&graph);
        debug!(
            "Graph audit: {} orphans, {} dead ends, {} broken links",
            graph_audit.orphans.len(),
            graph_audit.dead_ends.len(),
            graph_audit.broken_links.len()
        );

        let clusters = similarity::cluster(&records, self.config.similarity.threshold_bits);

        let front_matter: BTreeMap<String, FrontMatterReport> = records
            .iter()
            .map(|r| {
                (
                    r.path.clone(),
                    self.schema.validate(&r.front_matter, r.front_matter_present),
                )
            })
            .collect();

        let histories = git::collect_histories(vcs, records.iter().map(|r| r.path.as_str()));
        let stale_days = self.config.git.stale_days;
        let stale_files = git::stale_files(&histories, stale_days, now);

        let files: Vec<FileMetrics> = records
            .iter()
            .map(|r| {
                let history = histories.get(&r.path);
                let stale = history.is_some_and(|h| h.is_stale(stale_days, now));
                metrics::file_metrics(r, &graph, &front_matter[&r.path], history, stale)
            })
            .collect();

        let issues = issues::aggregate(AggregateInput {
            records: &records,
            graph_audit: &graph_audit,
            front_matter: &front_matter,
            clusters,
            stale_files,
            index_policy: &self.index_policy,
        });

        let repo = metrics::repo_metrics(RepoSummary {
            root: &root.display().to_string(),
            files: &files,
            files_skipped: skipped.len(),
            issues: &issues,
            git_enabled: vcs.enabled(),
            generated_at: now,
        });

        info!(
            "Audited {} documents: {} issues",
            records.len(),
            issues.total()
        );

        Ok(AuditOutcome {
            records,
            graph,
            graph_audit,
            front_matter,
            histories,
            files,
            issues,
            repo,
        })
    }

    /// Discover, scan and analyze in one call
    pub fn run(&self, root: &Path, vcs: &dyn VcsProvider, now: DateTime<Utc>) -> AuditResult<AuditOutcome> {
        let files = self.discover(root)?;
        let batch = self.scan(root, &files);
        self.analyze(root, batch, vcs, now)
    }

    fn build_graph(&self, root: &Path, records: &[DocumentRecord]) -> LinkGraph {
        let corpus = CorpusIndex::from_records(records);
        let index: Box<dyn TargetIndex> = if self.config.links.check_filesystem {
            Box::new(FilesystemIndex::new(corpus, root))
        } else {
            Box::new(corpus)
        };
        LinkGraph::build(records, index.as_ref())
    }
}

/// Split scan results into records and skipped paths, records sorted by path
pub fn collect_batch(results: Vec<Result<DocumentRecord, PathBuf>>) -> ScanBatch {
    let mut batch = ScanBatch::default();
    for result in results {
        match result {
            Ok(record) => batch.records.push(record),
            Err(path) => batch.skipped.push(path),
        }
    }
    batch.records.sort_by(|a, b| a.path.cmp(&b.path));
    batch
}

/// Run `f` on a dedicated pool with `workers` threads
pub fn with_workers<T, F>(workers: usize, f: F) -> AuditResult<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    Ok(pool.install(f))
}

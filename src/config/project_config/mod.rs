//! Project-level configuration support
//!
//! Loads per-project configuration from `docaudit.toml` in the audited root.
//! Every field is optional; missing sections fall back to the defaults below.
//!
//! # Configuration Format
//!
//! ```toml
//! # docaudit.toml
//!
//! [scan]
//! extensions = ["md", "txt"]
//! exclude_dirs = [".git", "node_modules", "dist"]
//! max_bytes = 2000000
//! tokens_per_word = 1.33
//!
//! [front_matter]
//! required = ["status", "type", "owner", "lastReviewed"]
//! suggested = ["author", "date", "version", "tags", "related_documents"]
//!
//! [links]
//! index_files = ["README.md", "index.md"]
//! check_filesystem = false
//!
//! [similarity]
//! threshold_bits = 3
//!
//! [git]
//! enabled = true
//! backend = "libgit2"
//! timeout_secs = 10
//! stale_days = 90
//!
//! [defaults]
//! format = "markdown"
//! workers = 8
//! ```

use crate::error::{AuditError, AuditResult};
use crate::frontmatter::{FrontMatterSchema, DEFAULT_REQUIRED_KEYS, DEFAULT_SUGGESTED_KEYS};
use crate::git::GitBackend;
use crate::scanner::ScanOptions;
use crate::similarity::DEFAULT_THRESHOLD_BITS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// File name looked up in the audited root
pub const CONFIG_FILE_NAME: &str = "docaudit.toml";

pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "txt"];

/// Directory names skipped at any depth
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".venv",
    "dist",
    "build",
    ".idea",
    ".vscode",
];

pub const DEFAULT_INDEX_FILES: &[&str] = &["README.md"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Full audit configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub front_matter: FrontMatterConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub git: GitConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Which files are read and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions to audit, with or without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped wherever they appear
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Bytes read per file; the rest is ignored
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_tokens_per_word")]
    pub tokens_per_word: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            max_bytes: default_max_bytes(),
            tokens_per_word: default_tokens_per_word(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    strings(DEFAULT_EXTENSIONS)
}

fn default_exclude_dirs() -> Vec<String> {
    strings(DEFAULT_EXCLUDE_DIRS)
}

fn default_max_bytes() -> usize {
    ScanOptions::default().max_bytes
}

fn default_tokens_per_word() -> f64 {
    ScanOptions::default().tokens_per_word
}

impl ScanConfig {
    /// Extensions lowercased without the leading dot, duplicates removed
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ext in &self.extensions {
            let ext = ext.trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !out.contains(&ext) {
                out.push(ext);
            }
        }
        out
    }

    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            max_bytes: self.max_bytes,
            tokens_per_word: self.tokens_per_word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatterConfig {
    #[serde(default = "default_required")]
    pub required: Vec<String>,

    #[serde(default = "default_suggested")]
    pub suggested: Vec<String>,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            required: default_required(),
            suggested: default_suggested(),
        }
    }
}

fn default_required() -> Vec<String> {
    strings(DEFAULT_REQUIRED_KEYS)
}

fn default_suggested() -> Vec<String> {
    strings(DEFAULT_SUGGESTED_KEYS)
}

impl FrontMatterConfig {
    pub fn schema(&self) -> FrontMatterSchema {
        FrontMatterSchema::new(self.required.clone(), self.suggested.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Navigation pages exempt from the related-links nudge
    /// (matched against the file name, case-insensitively)
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,

    /// Also accept link targets that exist on disk but are not audited
    /// documents (images, source files, other extensions)
    #[serde(default)]
    pub check_filesystem: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            index_files: default_index_files(),
            check_filesystem: false,
        }
    }
}

fn default_index_files() -> Vec<String> {
    strings(DEFAULT_INDEX_FILES)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Maximum Hamming distance between near-duplicate fingerprints
    #[serde(default = "default_threshold_bits")]
    pub threshold_bits: u32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold_bits: default_threshold_bits(),
        }
    }
}

fn default_threshold_bits() -> u32 {
    DEFAULT_THRESHOLD_BITS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: GitBackend,

    /// Per-invocation limit for the `git` binary
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Files whose last commit is older than this are reported stale
    #[serde(default = "default_stale_days")]
    pub stale_days: u32,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: GitBackend::default(),
            timeout_secs: default_timeout_secs(),
            stale_days: default_stale_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_stale_days() -> u32 {
    90
}

impl GitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

impl AuditConfig {
    /// Reject values the audit cannot run with
    pub fn validate(&self) -> AuditResult<()> {
        if self.scan.max_bytes == 0 {
            return Err(AuditError::InvalidConfig(
                "scan.max_bytes must be greater than 0".into(),
            ));
        }
        if !(self.scan.tokens_per_word.is_finite() && self.scan.tokens_per_word > 0.0) {
            return Err(AuditError::InvalidConfig(format!(
                "scan.tokens_per_word must be a positive number, got {}",
                self.scan.tokens_per_word
            )));
        }
        if self.scan.normalized_extensions().is_empty() {
            return Err(AuditError::InvalidConfig(
                "scan.extensions must name at least one extension".into(),
            ));
        }
        if self.similarity.threshold_bits > 64 {
            return Err(AuditError::InvalidConfig(format!(
                "similarity.threshold_bits must be at most 64, got {}",
                self.similarity.threshold_bits
            )));
        }
        if self.git.timeout_secs == 0 {
            return Err(AuditError::InvalidConfig(
                "git.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Load project configuration from the audited root.
///
/// Returns the default configuration if `docaudit.toml` is absent or cannot
/// be parsed; a parse failure is logged as a warning.
pub fn load_project_config(root: &Path) -> AuditConfig {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        match load_toml_config(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    AuditConfig::default()
}

/// Load configuration from a TOML file
pub fn load_toml_config(path: &Path) -> anyhow::Result<AuditConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AuditConfig = toml::from_str(&content)?;
    Ok(config)
}

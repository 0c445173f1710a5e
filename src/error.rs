//! Error types for the audit library
//!
//! Document-level problems are never errors: they degrade the document's own
//! metrics and surface as issues. Only setup failures end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort an audit run
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("No documentation files found under {root} (extensions: {extensions})")]
    NoDocuments { root: PathBuf, extensions: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to compile scanner pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;

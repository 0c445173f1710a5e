//! Docaudit - documentation corpus auditor
//!
//! Scans a tree of Markdown and text documents, resolves the links between
//! them, and reports broken links, orphans, dead ends, incomplete front
//! matter, near-duplicate documents and stale files.
//!
//! # Example
//!
//! ```no_run
//! use docaudit::config::load_project_config;
//! use docaudit::git::NoVcs;
//! use docaudit::pipeline::Auditor;
//! use std::path::Path;
//!
//! let root = Path::new("docs");
//! let auditor = Auditor::new(load_project_config(root))?;
//! let outcome = auditor.run(root, &NoVcs, chrono::Utc::now())?;
//! println!("{} issues", outcome.issues.total());
//! # Ok::<(), docaudit::error::AuditError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod git;
pub mod graph;
pub mod issues;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scanner;
pub mod similarity;

pub use error::{AuditError, AuditResult};
pub use pipeline::{AuditOutcome, Auditor};

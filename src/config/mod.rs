//! Configuration module for docaudit
//!
//! This module handles:
//! - Project-level configuration (docaudit.toml)
//! - Front-matter key sets and scan limits
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, load_toml_config, AuditConfig, CliDefaults, FrontMatterConfig,
    GitConfig, LinksConfig, ScanConfig, SimilarityConfig, CONFIG_FILE_NAME,
    DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS, DEFAULT_INDEX_FILES,
};

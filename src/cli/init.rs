//! Init command - write a starter docaudit.toml

use crate::config::{load_toml_config, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Docaudit configuration
# Every setting is optional; the values below are the built-in defaults.

[scan]
# File extensions to audit
extensions = ["md", "txt"]

# Directory names skipped wherever they appear
exclude_dirs = [".git", "node_modules", ".venv", "dist", "build", ".idea", ".vscode"]

# Bytes read per file; anything after is ignored
max_bytes = 2000000

# Token estimate per word
tokens_per_word = 1.33

[front_matter]
# Keys every document must declare
required = ["status", "type", "owner", "lastReviewed"]

# Keys worth adding once front matter exists
suggested = ["author", "date", "version", "tags", "related_documents"]

[links]
# Navigation pages that may have no outbound links to other documents
index_files = ["README.md"]

# Accept links to files on disk that are not audited documents (images, code)
check_filesystem = false

[similarity]
# Maximum fingerprint distance in bits for near-duplicate documents (0-64)
threshold_bits = 3

[git]
enabled = true

# History backend: "cli" (git binary) or "libgit2"
backend = "cli"

# Limit per git invocation
timeout_secs = 10

# Documents whose last commit is older than this are stale
stale_days = 90

[defaults]
# Output format on stdout (text, json, csv, markdown)
# format = "text"

# Number of parallel workers
# workers = 8
"#;

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    // Sanity check: the template must load back
    load_toml_config(&config_path)
        .with_context(|| format!("Generated config is invalid: {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;

    #[test]
    fn test_template_matches_defaults() {
        let config: AuditConfig = toml::from_str(DEFAULT_CONFIG).expect("template parses");
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        run(dir.path(), false).expect("init");
        let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).expect("read");
        assert_eq!(written, DEFAULT_CONFIG);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[git]\nenabled = false\n").expect("write");

        assert!(run(dir.path(), false).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "[git]\nenabled = false\n"
        );

        run(dir.path(), true).expect("init --force");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG);
    }
}

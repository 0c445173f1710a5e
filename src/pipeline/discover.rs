//! Document discovery and reading

use crate::error::{AuditError, AuditResult};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Per-directory ignore file honored during discovery
pub const IGNORE_FILE_NAME: &str = ".docauditignore";

/// Stems of the timestamped report files the analyze command writes
pub const REPORT_STEMS: &[&str] = &["repo_metrics", "file_metrics", "issues"];

/// Whether `name` is one of our own reports: `<stem>-YYYYMMDD-HHMMSSZ.<json|csv|md>`
pub fn is_report_file(name: &str) -> bool {
    let Some((base, ext)) = name.rsplit_once('.') else {
        return false;
    };
    if !matches!(ext, "json" | "csv" | "md") {
        return false;
    }
    REPORT_STEMS.iter().any(|stem| {
        base.strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(is_report_stamp)
    })
}

fn is_report_stamp(stamp: &str) -> bool {
    let b = stamp.as_bytes();
    b.len() == 16
        && b[8] == b'-'
        && b[15] == b'Z'
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[9..15].iter().all(u8::is_ascii_digit)
}

/// Collect every file under `root` with one of `extensions`.
///
/// Directories whose name is in `exclude_dirs` are pruned at any depth.
/// `.gitignore` rules do not apply; a `.docauditignore` file does. Report
/// files from earlier runs are skipped. The result is sorted by path.
pub fn discover_documents(
    root: &Path,
    extensions: &[String],
    exclude_dirs: &[String],
) -> AuditResult<Vec<PathBuf>> {
    let excluded: HashSet<String> = exclude_dirs.iter().cloned().collect();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .add_custom_ignore_filename(IGNORE_FILE_NAME)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && entry.depth() > 0 && excluded.contains(&*entry.file_name().to_string_lossy()))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == Some(0) => {
                return Err(AuditError::Walk {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warn!("Skipping unreadable path: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if !matches {
            continue;
        }
        if is_report_file(&entry.file_name().to_string_lossy()) {
            debug!("Skipping earlier report {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    debug!("Discovered {} documents under {}", files.len(), root.display());
    Ok(files)
}

/// `path` relative to `root` with `/` separators
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read at most `max_bytes` of a file; returns the bytes and the full size
pub fn read_capped(path: &Path, max_bytes: usize) -> std::io::Result<(Vec<u8>, u64)> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut buf = Vec::with_capacity(size.min(max_bytes as u64) as usize);
    file.take(max_bytes as u64).read_to_end(&mut buf)?;
    Ok((buf, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    fn rel_list(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|f| relative_path(root, f)).collect()
    }

    #[test]
    fn test_discover_filters_extensions_and_excludes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "README.md", "# r");
        write(root, "notes.TXT", "n");
        write(root, "src/main.rs", "fn main() {}");
        write(root, "docs/guide.md", "g");
        write(root, "docs/node_modules/pkg/README.md", "x");
        write(root, "node_modules/pkg/README.md", "x");
        write(root, ".github/CONTRIBUTING.md", "c");
        write(root, "build/out.md", "b");

        let exts = vec!["md".to_string(), "txt".to_string()];
        let excludes = vec!["node_modules".to_string(), "build".to_string()];
        let files = discover_documents(root, &exts, &excludes).expect("discover");

        assert_eq!(
            rel_list(root, &files),
            vec![".github/CONTRIBUTING.md", "README.md", "docs/guide.md", "notes.TXT"]
        );
    }

    #[test]
    fn test_gitignore_not_applied_but_docauditignore_is() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, ".gitignore", "ignored.md\n");
        write(root, IGNORE_FILE_NAME, "drafts/\n");
        write(root, "ignored.md", "i");
        write(root, "drafts/wip.md", "w");

        let files = discover_documents(root, &["md".to_string()], &[]).expect("discover");
        assert_eq!(rel_list(root, &files), vec!["ignored.md"]);
    }

    #[test]
    fn test_earlier_reports_not_discovered() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "README.md", "# r");
        write(root, "issues-20240501-123000Z.md", "# Documentation Issues");
        write(root, "reports/issues-20240502-080000Z.md", "# Documentation Issues");
        write(root, "repo_metrics-20240501-123000Z.json", "{}");
        write(root, "issues-2024.md", "# a real page");
        write(root, "known-issues-20240501-123000Z.md", "k");

        let exts = vec!["md".to_string(), "json".to_string()];
        let files = discover_documents(root, &exts, &[]).expect("discover");
        assert_eq!(
            rel_list(root, &files),
            vec!["README.md", "issues-2024.md", "known-issues-20240501-123000Z.md"]
        );
    }

    #[test]
    fn test_is_report_file() {
        assert!(is_report_file("file_metrics-20240501-123000Z.csv"));
        assert!(is_report_file("repo_metrics-19991231-235959Z.json"));
        assert!(!is_report_file("issues-20240501-123000Z.txt"));
        assert!(!is_report_file("issues-20240501-123000.md"));
        assert!(!is_report_file("issues-2024050a-123000Z.md"));
        assert!(!is_report_file("issues.md"));
        assert!(!is_report_file("changelog-20240501-123000Z.md"));
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = discover_documents(&dir.path().join("nope"), &["md".to_string()], &[]);
        assert!(matches!(result, Err(AuditError::Walk { .. })));
    }

    #[test]
    fn test_read_capped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a.md");
        fs::write(&path, "0123456789").expect("write");

        let (bytes, size) = read_capped(&path, 4).expect("read");
        assert_eq!(bytes, b"0123");
        assert_eq!(size, 10);

        let (bytes, _) = read_capped(&path, 100).expect("read");
        assert_eq!(bytes.len(), 10);
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(relative_path(root, &root.join("docs").join("a.md")), "docs/a.md");
    }
}

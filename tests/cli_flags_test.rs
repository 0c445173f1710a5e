//! CLI contract tests
//!
//! Runs the docaudit binary against scratch documentation trees and checks
//! exit codes, stdout formats and the report files it writes.

use std::path::Path;
use std::process::{Command, Output};

fn docaudit_bin() -> &'static str {
    env!("CARGO_BIN_EXE_docaudit")
}

fn setup_docs() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        ("README.md", "# Home\n[Guide](guide.md)\n"),
        ("guide.md", "# Guide\n[home](README.md) [missing](missing.md)\n"),
        ("orphan.md", "# Orphan\nNo links here.\n"),
    ];
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(docaudit_bin())
        .args(args)
        .arg(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn report_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("repo_metrics-") || n.starts_with("file_metrics-") || n.starts_with("issues-"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_json_format_on_stdout() {
    let dir = setup_docs();
    let out = run(dir.path(), &["analyze", "--format", "json", "--no-git", "--no-write"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(parsed["files_analyzed"], 3);
    assert_eq!(parsed["issues"]["orphans"][0], "orphan.md");
    assert_eq!(parsed["issues"]["dead_ends"][0], "orphan.md");
    assert_eq!(parsed["issues"]["broken_internal_links"][0]["source"], "guide.md");
    assert_eq!(parsed["issues"]["broken_internal_links"][0]["target"], "missing.md");
    assert_eq!(parsed["git_enabled"], false);
    assert!(report_files(dir.path()).is_empty());
}

#[test]
fn test_writes_timestamped_reports() {
    let dir = setup_docs();
    let out_dir = dir.path().join("reports");
    let out = run(
        dir.path(),
        &["analyze", "--no-git", "--out-dir", out_dir.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let names = report_files(&out_dir);
    assert_eq!(names.len(), 3, "{names:?}");
    assert!(names[0].starts_with("file_metrics-") && names[0].ends_with("Z.csv"));
    assert!(names[1].starts_with("issues-") && names[1].ends_with("Z.md"));
    assert!(names[2].starts_with("repo_metrics-") && names[2].ends_with("Z.json"));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Documentation Audit"));
}

#[test]
fn test_default_command_writes_next_to_docs() {
    let dir = setup_docs();
    let out = Command::new(docaudit_bin())
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(report_files(dir.path()).len(), 3);
}

#[test]
fn test_second_run_ignores_first_run_reports() {
    let dir = setup_docs();
    let first = run(dir.path(), &["analyze", "--format", "json", "--no-git"]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(report_files(dir.path()).len(), 3);

    // Later timestamp so the second run writes a fresh set
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = run(dir.path(), &["analyze", "--format", "json", "--no-git"]);
    assert!(second.status.success(), "stderr: {}", String::from_utf8_lossy(&second.stderr));

    let first: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(second["files_analyzed"], 3);
    assert_eq!(first["files_analyzed"], second["files_analyzed"]);
    assert_eq!(first["issues"]["orphans"], second["issues"]["orphans"]);
    assert_eq!(report_files(dir.path()).len(), 6);
}

#[test]
fn test_fail_on_issues_exit_code() {
    let dir = setup_docs();
    let out = run(dir.path(), &["analyze", "--no-git", "--no-write", "--fail-on-issues"]);
    assert_eq!(out.status.code(), Some(1));

    let out = run(dir.path(), &["analyze", "--no-git", "--no-write"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_empty_corpus_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
    let out = run(dir.path(), &["analyze", "--no-git", "--no-write"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("No documentation files found"));
}

#[test]
fn test_ext_flag_limits_discovery() {
    let dir = setup_docs();
    std::fs::write(dir.path().join("notes.txt"), "plain notes\n").unwrap();

    let out = run(dir.path(), &["analyze", "--format", "json", "--no-git", "--no-write"]);
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["files_analyzed"], 4);

    let out = run(
        dir.path(),
        &["analyze", "--format", "json", "--no-git", "--no-write", "--ext", "md"],
    );
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["files_analyzed"], 3);
}

#[test]
fn test_csv_format_on_stdout() {
    let dir = setup_docs();
    let out = run(dir.path(), &["analyze", "--format", "csv", "--no-git", "--no-write"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("file,directory,size_bytes"));
    assert!(lines[1].starts_with("README.md,"));
}

#[test]
fn test_config_file_defaults() {
    let dir = setup_docs();
    std::fs::write(
        dir.path().join("docaudit.toml"),
        "[defaults]\nformat = \"json\"\n\n[git]\nenabled = false\n",
    )
    .unwrap();
    let out = run(dir.path(), &["analyze", "--no-write"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).expect("JSON from config default");
    assert_eq!(parsed["git_enabled"], false);
}

#[test]
fn test_init_creates_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["init"]);
    assert!(out.status.success());
    assert!(dir.path().join("docaudit.toml").exists());

    let out = run(dir.path(), &["init"]);
    assert!(!out.status.success());

    let out = run(dir.path(), &["init", "--force"]);
    assert!(out.status.success());
}

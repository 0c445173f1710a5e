//! History lookups through the `git` binary
//!
//! Every invocation runs with a deadline. A hung or missing `git` costs at
//! most one timeout per file and yields an unknown history.

use super::{FileHistory, VcsProvider};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Use `git` for `root` if the binary exists and `root` is in a work tree
    pub fn detect(root: &Path, timeout: Duration) -> Option<Self> {
        let cli = Self {
            root: root.to_path_buf(),
            timeout,
        };
        let inside = cli.run(&["rev-parse", "--is-inside-work-tree"])?;
        (inside.trim() == "true").then_some(cli)
    }

    /// Run `git -C <root> <args>`; `None` on spawn failure, timeout or a
    /// non-zero exit status.
    fn run(&self, args: &[&str]) -> Option<String> {
        let child = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        match child {
            Ok(child) => run_with_timeout(child, self.timeout),
            Err(e) => {
                debug!("Failed to spawn git: {e}");
                None
            }
        }
    }
}

impl VcsProvider for GitCli {
    fn name(&self) -> &'static str {
        "git"
    }

    fn file_history(&self, rel_path: &str) -> FileHistory {
        let last_commit = self
            .run(&["log", "-1", "--format=%cI", "--", rel_path])
            .map(|out| out.trim().to_string())
            .unwrap_or_default();
        let commit_count = self
            .run(&["rev-list", "--count", "HEAD", "--", rel_path])
            .and_then(|out| out.trim().parse::<u32>().ok())
            .unwrap_or(0);

        FileHistory {
            commit_count,
            last_commit,
        }
    }
}

/// Wait for `child` up to `timeout`, killing it if it runs over
fn run_with_timeout(mut child: Child, timeout: Duration) -> Option<String> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let mut stdout = String::new();
                if let Some(mut pipe) = child.stdout.take() {
                    // Undecodable output is treated the same as no output
                    if pipe.read_to_string(&mut stdout).is_err() {
                        return None;
                    }
                }
                return status.success().then_some(stdout);
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("git timed out after {:?}", timeout);
                    return None;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                debug!("Failed to wait for git: {e}");
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_kills_process() {
        let child = Command::new("sleep")
            .arg("5")
            .stdout(Stdio::piped())
            .spawn();
        let Ok(child) = child else {
            return;
        };
        let start = Instant::now();
        assert!(run_with_timeout(child, Duration::from_millis(100)).is_none());
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_failed_command_yields_none() {
        let Ok(child) = Command::new("false").stdout(Stdio::piped()).spawn() else {
            return;
        };
        assert!(run_with_timeout(child, Duration::from_secs(5)).is_none());
    }
}

// Version-control prober: branch, uncommitted change count, last commit.
// Each git call degrades its own field; only a missing git binary or a
// vanished directory fails the whole probe.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::{instrument, warn};

use crate::config::GitConfig;
use crate::error::ProbeError;
use crate::models::{ErrorNote, GitStatus, VcsStatus};

pub const UNKNOWN_BRANCH: &str = "unknown";
pub const NO_COMMITS: &str = "No commits";

const GIT: &str = "git";
const MARKER_DIR: &str = ".git";

#[derive(Debug, Clone)]
pub struct GitProbe {
    program: PathBuf,
    call_timeout: Duration,
    retries: u32,
}

/// Why one git call produced no usable output.
enum CallError {
    /// Non-zero exit, undecodable output, or timeout after all retries.
    Field,
    Fatal(ProbeError),
}

impl GitProbe {
    pub fn new(config: &GitConfig) -> Self {
        Self::with_program(config, GIT)
    }

    /// Same as `new`, but runs `program` instead of resolving `git` from PATH.
    pub fn with_program(config: &GitConfig, program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            call_timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
        }
    }

    #[instrument(skip(self), fields(probe = "git"))]
    pub async fn probe(&self, dir: &Path) -> GitStatus {
        if !tokio::fs::try_exists(dir.join(MARKER_DIR))
            .await
            .unwrap_or(false)
        {
            return GitStatus::no_repository();
        }

        let (branch, status, last_commit) = tokio::join!(
            self.run(dir, &["branch", "--show-current"]),
            self.run(dir, &["status", "--porcelain"]),
            self.run(dir, &["log", "-1", "--oneline"]),
        );

        let branch = match branch {
            Ok(out) => out.trim().to_string(),
            Err(CallError::Fatal(e)) => return GitStatus::Unavailable(ErrorNote::from(e)),
            Err(CallError::Field) => UNKNOWN_BRANCH.to_string(),
        };
        let uncommitted_changes = match status {
            Ok(out) => Some(count_changes(&out)),
            Err(CallError::Fatal(e)) => return GitStatus::Unavailable(ErrorNote::from(e)),
            Err(CallError::Field) => None,
        };
        let last_commit = match last_commit {
            Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
            Ok(_) | Err(CallError::Field) => NO_COMMITS.to_string(),
            Err(CallError::Fatal(e)) => return GitStatus::Unavailable(ErrorNote::from(e)),
        };

        GitStatus::Repository(VcsStatus {
            branch,
            uncommitted_changes,
            last_commit,
        })
    }

    /// Runs `git -C dir <args>` and returns stdout. Only timeouts are retried.
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String, CallError> {
        let operation = args.first().copied().unwrap_or_default();
        for attempt in 0..=self.retries {
            let child = Command::new(&self.program)
                .arg("-C")
                .arg(dir)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output();
            let output = match timeout(self.call_timeout, child).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(CallError::Fatal(ProbeError::ToolUnavailable {
                        tool: GIT,
                        source: e,
                    }));
                }
                Ok(Err(e)) => {
                    warn!(error = %e, operation, "git call could not be spawned");
                    return Err(field_or_vanished(dir).await);
                }
                Err(_) => {
                    warn!(
                        operation,
                        attempt,
                        timeout_ms = self.call_timeout.as_millis() as u64,
                        "git call timed out"
                    );
                    continue;
                }
            };
            if !output.status.success() {
                tracing::debug!(
                    operation,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git call failed"
                );
                return Err(field_or_vanished(dir).await);
            }
            return String::from_utf8(output.stdout).map_err(|_| CallError::Field);
        }
        Err(CallError::Field)
    }

}

async fn field_or_vanished(dir: &Path) -> CallError {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => CallError::Field,
        _ => CallError::Fatal(ProbeError::DirectoryVanished(dir.to_path_buf())),
    }
}

/// Non-empty lines of `git status --porcelain` output.
pub fn count_changes(porcelain: &str) -> u64 {
    porcelain.lines().filter(|l| !l.trim().is_empty()).count() as u64
}

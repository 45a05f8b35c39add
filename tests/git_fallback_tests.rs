// Git field fallbacks, driven by shell scripts standing in for the git binary
#![cfg(unix)]

mod common;

use common::*;
use projectwatch::config::GitConfig;
use projectwatch::git_probe::{GitProbe, UNKNOWN_BRANCH};
use projectwatch::models::GitStatus;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const SLOW_STATUS: &str = r#"#!/bin/sh
case "$3" in
  branch) echo main ;;
  status) echo call >> "$0.calls"; exec sleep 5 ;;
  log) echo "abc first" ;;
esac
"#;

const FAILING_BRANCH: &str = r#"#!/bin/sh
case "$3" in
  branch) echo "fatal: ambiguous HEAD" >&2; exit 1 ;;
  status) printf ' M a.swift\n?? b.swift\n' ;;
  log) echo "abc first" ;;
esac
"#;

/// All scripts are written before any test spawns a child, so no forked
/// process can inherit a script's write handle.
fn scripts() -> &'static Path {
    static DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::TempDir::new().unwrap();
        for (name, body) in [("slow-status", SLOW_STATUS), ("failing-branch", FAILING_BRANCH)] {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
    .path()
}

fn fake_git(script: &str, timeout_ms: u64, retries: u32) -> GitProbe {
    GitProbe::with_program(
        &GitConfig {
            timeout_ms,
            retries,
        },
        scripts().join(script),
    )
}

/// A directory that passes the `.git` marker check.
fn marked_repo() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    write_file(dir.path(), "a.swift", "");
    dir
}

#[tokio::test]
async fn status_timeout_nulls_change_count_after_retrying() {
    let repo = marked_repo();
    let git = fake_git("slow-status", 300, 1);
    let calls: PathBuf = scripts().join("slow-status.calls");

    let started = Instant::now();
    let status = git.probe(repo.path()).await;
    let elapsed = started.elapsed();

    let GitStatus::Repository(vcs) = status else {
        panic!("expected repository status, got {:?}", status);
    };
    assert_eq!(vcs.branch, "main");
    assert_eq!(vcs.uncommitted_changes, None);
    assert_eq!(vcs.last_commit, "abc first");
    assert!(elapsed >= Duration::from_millis(600), "took {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);

    let attempts = std::fs::read_to_string(calls).unwrap();
    assert_eq!(attempts.lines().count(), 2);
}

#[tokio::test]
async fn failing_branch_call_falls_back_to_unknown() {
    let repo = marked_repo();
    let git = fake_git("failing-branch", 5000, 1);

    let status = git.probe(repo.path()).await;

    let GitStatus::Repository(vcs) = status else {
        panic!("expected repository status, got {:?}", status);
    };
    assert_eq!(vcs.branch, UNKNOWN_BRANCH);
    assert_eq!(vcs.uncommitted_changes, Some(2));
    assert_eq!(vcs.last_commit, "abc first");
}

#[tokio::test]
async fn missing_git_binary_fails_whole_status() {
    let repo = marked_repo();
    let git = fake_git("no-such-git", 5000, 1);

    let status = git.probe(repo.path()).await;

    let GitStatus::Unavailable(note) = status else {
        panic!("expected error note, got {:?}", status);
    };
    assert!(
        note.error.starts_with("git could not be started: "),
        "{}",
        note.error
    );
}

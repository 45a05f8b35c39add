// Shared test helpers: synthetic project trees, config, fake host probes
#![allow(dead_code)]

use filetime::FileTime;
use projectwatch::aggregator::SnapshotAggregator;
use projectwatch::config::AppConfig;
use projectwatch::error::ProbeError;
use projectwatch::models::SystemStats;
use projectwatch::sysinfo_repo::HostProbe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const IOS_DIR: &str = "FlexPort iOS";
pub const ANDROID_DIR: &str = "FlexPort Android";
pub const LOGS_DIR: &str = "terminal_logs";

/// Host probe returning fixed numbers so snapshots are reproducible.
pub struct FixedHost(pub SystemStats);

impl HostProbe for FixedHost {
    fn system_stats(&self) -> Result<SystemStats, ProbeError> {
        Ok(self.0.clone())
    }
}

/// Host probe whose process table cannot be read.
pub struct FailingHost;

impl HostProbe for FailingHost {
    fn system_stats(&self) -> Result<SystemStats, ProbeError> {
        Err(ProbeError::ProcessTable("ps: permission denied".into()))
    }
}

pub fn fixed_stats() -> SystemStats {
    SystemStats {
        agent_processes: 3,
        load_avg: [0.5, 0.25, 0.125],
    }
}

pub fn fixed_host() -> Arc<dyn HostProbe> {
    Arc::new(FixedHost(fixed_stats()))
}

pub fn test_config_str(root: &Path) -> String {
    format!(
        r#"
[monitoring]
root_dir = '{}'
process_pattern = "claude"

[logs]
dir = "{LOGS_DIR}"

[git]
timeout_ms = 5000
retries = 0

[[projects]]
name = "ios"
label = "iOS Project"
dir = "{IOS_DIR}"

[projects.file_classes]
swift_files = [".swift"]

[[projects]]
name = "android"
label = "Android Project"
dir = "{ANDROID_DIR}"

[projects.file_classes]
kotlin_files = [".kt"]
java_files = [".java"]
"#,
        root.display()
    )
}

pub fn test_config(root: &Path) -> AppConfig {
    AppConfig::load_from_str(&test_config_str(root)).unwrap()
}

pub fn aggregator(root: &Path, host: Arc<dyn HostProbe>) -> SnapshotAggregator {
    SnapshotAggregator::new(&test_config(root), host)
}

/// Writes `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn set_mtime(path: &Path, unix_secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
}

/// iOS tree with two top-level swift files and a newer nested one, an android
/// tree with kotlin/java sources, and a log directory with one short and one empty log.
pub fn populate_workspace(root: &Path) {
    let a = write_file(root, &format!("{IOS_DIR}/a.swift"), "struct A {}\n");
    let b = write_file(root, &format!("{IOS_DIR}/b.swift"), "struct B {}\n");
    let c = write_file(root, &format!("{IOS_DIR}/sub/c.swift"), "struct C {}\n");
    set_mtime(&a, 1_700_000_000);
    set_mtime(&b, 1_700_000_100);
    set_mtime(&c, 1_700_000_200);

    let kt = write_file(root, &format!("{ANDROID_DIR}/Main.kt"), "fun main() {}\n");
    let java = write_file(root, &format!("{ANDROID_DIR}/App.java"), "class App {}\n");
    write_file(root, &format!("{ANDROID_DIR}/README.md"), "# android\n");
    set_mtime(&kt, 1_700_000_300);
    set_mtime(&java, 1_700_000_400);

    write_file(
        root,
        &format!("{LOGS_DIR}/build.log"),
        "step 1\nstep 2\nstep 3\nstep 4\nstep 5\n",
    );
    write_file(root, &format!("{LOGS_DIR}/empty.log"), "");
}

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Runs git in `dir` with a throwaway identity; panics on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

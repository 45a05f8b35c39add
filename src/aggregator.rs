// Snapshot aggregator: runs every prober and merges their outputs.
// Failures are contained per project and per field; building a snapshot never fails.

use chrono::Local;
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::config::AppConfig;
use crate::error::ProbeError;
use crate::fs_probe;
use crate::git_probe::GitProbe;
use crate::log_tailer;
use crate::models::{ErrorNote, ProjectStats, Probed, Snapshot, SystemStats, TerminalLogs};
use crate::sysinfo_repo::HostProbe;

/// Resolved settings for one project.
#[derive(Debug, Clone)]
struct ProjectTarget {
    name: String,
    path: PathBuf,
    file_classes: std::collections::BTreeMap<String, Vec<String>>,
    suffixes: Vec<String>,
}

#[derive(Debug)]
struct LogTarget {
    dir: PathBuf,
    suffixes: Vec<String>,
    tail_lines: usize,
}

/// Cheap to clone; holds only immutable settings.
#[derive(Clone)]
pub struct SnapshotAggregator {
    projects: Arc<Vec<ProjectTarget>>,
    logs: Arc<LogTarget>,
    git: GitProbe,
    host: Arc<dyn HostProbe>,
}

impl SnapshotAggregator {
    pub fn new(config: &AppConfig, host: Arc<dyn HostProbe>) -> Self {
        let projects = config
            .projects
            .iter()
            .map(|p| ProjectTarget {
                name: p.name.clone(),
                path: config.project_path(p),
                file_classes: p.file_classes.clone(),
                suffixes: p.all_suffixes(),
            })
            .collect();
        Self {
            projects: Arc::new(projects),
            logs: Arc::new(LogTarget {
                dir: config.log_dir(),
                suffixes: config.logs.suffixes.clone(),
                tail_lines: config.logs.tail_lines,
            }),
            git: GitProbe::new(&config.git),
            host,
        }
    }

    /// Builds one snapshot, timestamped when aggregation starts.
    #[instrument(skip(self), fields(projects = self.projects.len()))]
    pub async fn snapshot(&self) -> Snapshot {
        let timestamp = Local::now();
        let project_futures = self.projects.iter().map(|p| async move {
            (p.name.clone(), self.probe_project(p).await)
        });
        let (projects, system, terminal_logs) = tokio::join!(
            join_all(project_futures),
            self.probe_system(),
            self.terminal_logs(),
        );
        Snapshot {
            timestamp,
            projects: projects.into_iter().collect(),
            system,
            terminal_logs,
        }
    }

    /// Log tails only, as served on /api/terminal.
    pub async fn terminal_logs(&self) -> TerminalLogs {
        let logs = self.logs.clone();
        match tokio::task::spawn_blocking(move || {
            log_tailer::tail_logs(&logs.dir, &logs.suffixes, logs.tail_lines)
        })
        .await
        {
            Ok(tails) => tails,
            Err(e) => {
                warn!(error = %e, operation = "tail_logs", "log tailer task failed");
                TerminalLogs::new()
            }
        }
    }

    async fn probe_project(&self, project: &ProjectTarget) -> Probed<ProjectStats> {
        let target = project.clone();
        let tree = tokio::task::spawn_blocking(move || {
            fs_probe::probe_tree(&target.path, &target.file_classes, &target.suffixes)
        });
        let (tree, git_status) = tokio::join!(tree, self.git.probe(&project.path));

        match tree.map_err(ProbeError::from).and_then(|r| r) {
            Ok(tree) => Probed::Ok(ProjectStats {
                file_counts: tree.file_counts,
                last_modified: tree.last_modified,
                git_status,
            }),
            Err(e) => {
                warn!(
                    error = %e,
                    project = %project.name,
                    operation = "probe_project",
                    "project probe failed"
                );
                Probed::Failed(ErrorNote::from(e))
            }
        }
    }

    async fn probe_system(&self) -> Probed<SystemStats> {
        let host = self.host.clone();
        let result = tokio::task::spawn_blocking(move || host.system_stats())
            .await
            .map_err(ProbeError::from)
            .and_then(|r| r);
        if let Err(e) = &result {
            warn!(error = %e, operation = "system_stats", "system probe failed");
        }
        result.into()
    }
}

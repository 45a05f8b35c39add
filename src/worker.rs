// Background sampler: builds a snapshot on a fixed interval, logs a summary, discards it.

use tokio::time::{Duration, interval};
use tracing::Instrument;

use crate::aggregator::SnapshotAggregator;
use crate::models::{GitStatus, Probed, Snapshot};

pub struct WorkerConfig {
    pub summary_interval_secs: u64,
}

pub fn spawn(
    aggregator: SnapshotAggregator,
    config: WorkerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        summary_interval_secs = config.summary_interval_secs
    );
    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_secs(config.summary_interval_secs));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let snapshot = aggregator.snapshot().await;
                        log_summary(&snapshot);
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}

/// One line per project plus system and log counts.
pub fn log_summary(snapshot: &Snapshot) {
    for (name, project) in &snapshot.projects {
        match project {
            Probed::Ok(stats) => {
                let files: u64 = stats.file_counts.values().sum();
                let (branch, changes) = match &stats.git_status {
                    GitStatus::Repository(vcs) => {
                        (vcs.branch.as_str(), vcs.uncommitted_changes.unwrap_or_default())
                    }
                    GitStatus::NoRepository { .. } => ("-", 0),
                    GitStatus::Unavailable(_) => ("?", 0),
                };
                tracing::info!(
                    project = %name,
                    files,
                    last_modified = stats.last_modified.as_ref().map(|m| m.file.as_str()).unwrap_or("-"),
                    branch,
                    uncommitted_changes = changes,
                    "project summary"
                );
            }
            Probed::Failed(note) => {
                tracing::warn!(project = %name, error = %note.error, "project unavailable");
            }
        }
    }
    match &snapshot.system {
        Probed::Ok(system) => tracing::info!(
            matching_processes = system.agent_processes,
            load_1m = system.load_avg[0],
            log_files = snapshot.terminal_logs.len(),
            "system summary"
        ),
        Probed::Failed(note) => tracing::warn!(
            error = %note.error,
            log_files = snapshot.terminal_logs.len(),
            "system unavailable"
        ),
    }
}

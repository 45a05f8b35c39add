// Process table and load average via sysinfo

use sysinfo::{
    LoadAvg, Process, ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind, UpdateKind,
};
use tracing::instrument;

use crate::error::ProbeError;
use crate::models::SystemStats;

/// Host-level probe. Called from a blocking task once per snapshot.
pub trait HostProbe: Send + Sync {
    fn system_stats(&self) -> Result<SystemStats, ProbeError>;
}

/// Reads a fresh process table on every call; nothing is cached between snapshots.
pub struct SysinfoRepo {
    pattern: String,
}

impl SysinfoRepo {
    pub fn new(process_pattern: &str) -> Self {
        Self {
            pattern: process_pattern.to_lowercase(),
        }
    }
}

impl HostProbe for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "system_stats"))]
    fn system_stats(&self) -> Result<SystemStats, ProbeError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::ProcessTable(format!(
                "{} is not supported",
                std::env::consts::OS
            )));
        }
        let load = load_average()?;

        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
        );
        if sys.processes().is_empty() {
            return Err(ProbeError::ProcessTable("no processes visible".into()));
        }
        let matching = sys
            .processes()
            .values()
            .filter(|p| !is_userland_thread(p))
            .filter(|p| process_matches(p, &self.pattern))
            .count()
            .min(u32::MAX as usize) as u32;

        Ok(SystemStats {
            agent_processes: matching,
            load_avg: [load.one, load.five, load.fifteen],
        })
    }
}

#[cfg(not(windows))]
fn load_average() -> Result<LoadAvg, ProbeError> {
    Ok(System::load_average())
}

// sysinfo reports zeros on Windows; surface that as unavailable instead.
#[cfg(windows)]
fn load_average() -> Result<LoadAvg, ProbeError> {
    Err(ProbeError::ProcessTable(
        "load average is not available on windows".into(),
    ))
}

/// Linux lists every task of a process alongside it; only the process itself counts.
fn is_userland_thread(process: &Process) -> bool {
    matches!(process.thread_kind(), Some(ThreadKind::Userland))
}

fn process_matches(process: &Process, pattern: &str) -> bool {
    matches_pattern(&process.name().to_string_lossy(), pattern)
        || process
            .cmd()
            .iter()
            .any(|arg| matches_pattern(&arg.to_string_lossy(), pattern))
}

/// Case-insensitive substring match; `pattern` is already lowercase.
fn matches_pattern(text: &str, pattern: &str) -> bool {
    text.to_lowercase().contains(pattern)
}

// Probe failure taxonomy. Every variant ends up as an ErrorNote on one field.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Directory missing or not listable.
    #[error("cannot read {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{tool} could not be started: {source}")]
    ToolUnavailable {
        tool: &'static str,
        source: std::io::Error,
    },

    #[error("working directory vanished: {}", .0.display())]
    DirectoryVanished(PathBuf),

    #[error("process table unavailable: {0}")]
    ProcessTable(String),

    #[error("probe task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ProbeError {
    fn from(e: tokio::task::JoinError) -> Self {
        ProbeError::Task(e.to_string())
    }
}

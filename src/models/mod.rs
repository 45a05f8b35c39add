// Wire models for the snapshot document served on /api/stats

mod note;
mod project;
mod snapshot;
mod system;

pub use note::{ErrorNote, Probed};
pub use project::{
    GitStatus, LastModified, NoRepository, ProjectStats, RESERVED_STAT_KEYS, VcsStatus,
};
pub use snapshot::{RESERVED_KEYS, Snapshot, TerminalLogs};
pub use system::SystemStats;

// Per-project source tree and version-control models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ErrorNote;

/// Keys a file-class count may not use; they collide with the fixed fields or an ErrorNote.
pub const RESERVED_STAT_KEYS: [&str; 3] = ["last_modified", "git_status", "error"];

/// One configured project directory. File-class counts are flattened next to
/// the fixed fields, e.g. `{"swift_files": 2, "last_modified": ..., "git_status": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(flatten)]
    pub file_counts: BTreeMap<String, u64>,
    pub last_modified: Option<LastModified>,
    pub git_status: GitStatus,
}

/// Most recently modified matching file, path relative to the project root with a leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModified {
    pub file: String,
    pub time: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsStatus {
    pub branch: String,
    /// `None` when the status call failed.
    pub uncommitted_changes: Option<u64>,
    pub last_commit: String,
}

/// Sentinel value of the `status` field for directories without `.git`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoRepository {
    #[serde(rename = "No git repository")]
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GitStatus {
    Unavailable(ErrorNote),
    NoRepository { status: NoRepository },
    Repository(VcsStatus),
}

impl GitStatus {
    pub fn no_repository() -> Self {
        GitStatus::NoRepository {
            status: NoRepository::Marker,
        }
    }

    pub fn is_no_repository(&self) -> bool {
        matches!(self, GitStatus::NoRepository { .. })
    }
}

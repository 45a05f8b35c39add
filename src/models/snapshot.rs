// Root snapshot document

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ProjectStats, Probed, SystemStats};

/// Log file name -> tail lines, newest last.
pub type TerminalLogs = BTreeMap<String, Vec<String>>;

/// Keys owned by the snapshot itself; project names may not use them.
pub const RESERVED_KEYS: [&str; 3] = ["timestamp", "system", "terminal_logs"];

/// One aggregation of all monitored data. Projects are flattened to top-level
/// keys named after the configured project (`ios`, `android`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub projects: BTreeMap<String, Probed<ProjectStats>>,
    pub system: Probed<SystemStats>,
    pub terminal_logs: TerminalLogs,
}

// Host-level process and load models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    /// Processes whose name or command line matches `monitoring.process_pattern`.
    #[serde(rename = "claude_processes")]
    pub agent_processes: u32,
    pub load_avg: [f64; 3],
}

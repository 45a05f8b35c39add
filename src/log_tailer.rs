// Log tailer: last N lines of every log file in one directory.
// Files are read whole; logs are assumed small and local.

use std::path::Path;
use tracing::warn;

use crate::models::TerminalLogs;

/// Tails every file in `dir` whose name ends with one of `suffixes`.
/// A missing directory yields an empty mapping. A file that cannot be read
/// keeps its entry with a single line describing the error.
pub fn tail_logs(dir: &Path, suffixes: &[String], max_lines: usize) -> TerminalLogs {
    let mut logs = TerminalLogs::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return logs,
        Err(e) => {
            warn!(error = %e, dir = %dir.display(), operation = "tail_logs", "log directory unreadable");
            return logs;
        }
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let lines = match tail_file(&entry.path(), max_lines) {
            Ok(lines) => lines,
            Err(e) => vec![format!("Error reading log: {}", e)],
        };
        logs.insert(name, lines);
    }
    logs
}

/// Last `max_lines` lines of `path`, oldest first, without line terminators.
pub fn tail_file(path: &Path, max_lines: usize) -> std::io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(tail_lines(&String::from_utf8_lossy(&bytes), max_lines))
}

fn tail_lines(content: &str, max_lines: usize) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].iter().map(|l| l.to_string()).collect()
}

// Filesystem prober: shallow file-class counts and recursive last-modified search.
// Counts look at the project root only; recency walks the whole tree.

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::path::{Component, Path};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::error::ProbeError;
use crate::models::LastModified;

/// Result of one filesystem probe for a project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub file_counts: BTreeMap<String, u64>,
    pub last_modified: Option<LastModified>,
}

/// Probes `root` for every file class plus the newest file matching any suffix.
pub fn probe_tree(
    root: &Path,
    file_classes: &BTreeMap<String, Vec<String>>,
    all_suffixes: &[String],
) -> Result<TreeStats, ProbeError> {
    let names = list_entry_names(root)?;
    let file_counts = file_classes
        .iter()
        .map(|(key, suffixes)| {
            let count = names.iter().filter(|n| matches_any(n, suffixes)).count() as u64;
            (key.clone(), count)
        })
        .collect();
    Ok(TreeStats {
        file_counts,
        last_modified: last_modified(root, all_suffixes),
    })
}

/// Newest matching file anywhere below `root`. Unreadable subtrees are skipped;
/// symlinked files are included but symlinked directories are not descended.
/// Ties keep the first file in walk order (entries sorted by name).
pub fn last_modified(root: &Path, suffixes: &[String]) -> Option<LastModified> {
    let mut latest: Option<(SystemTime, std::path::PathBuf)> = None;
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !matches_any(&name, suffixes) {
            continue;
        }
        // Symlinked files count with their target's mtime; dangling links are skipped.
        let Some(mtime) = std::fs::metadata(entry.path())
            .ok()
            .filter(|m| m.is_file())
            .and_then(|m| m.modified().ok())
        else {
            continue;
        };
        if latest.as_ref().is_none_or(|(t, _)| mtime > *t) {
            latest = Some((mtime, entry.into_path()));
        }
    }
    latest.map(|(mtime, path)| LastModified {
        file: relative_display(root, &path),
        time: DateTime::<Local>::from(mtime),
    })
}

fn list_entry_names(root: &Path) -> Result<Vec<String>, ProbeError> {
    let unavailable = |source| ProbeError::Unavailable {
        path: root.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in std::fs::read_dir(root).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

fn matches_any(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|s| name.ends_with(s.as_str()))
}

/// `root/sub/c.swift` -> `/sub/c.swift`, always with forward slashes.
fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            out.push('/');
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

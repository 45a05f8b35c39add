// Wire schema tests: JSON shape and round-trip of the snapshot document

use chrono::{Local, TimeZone};
use projectwatch::models::*;
use std::collections::BTreeMap;

fn sample_snapshot() -> Snapshot {
    let time = Local.timestamp_opt(1_700_000_200, 0).unwrap();
    let mut projects = BTreeMap::new();
    projects.insert(
        "ios".to_string(),
        Probed::Ok(ProjectStats {
            file_counts: BTreeMap::from([("swift_files".to_string(), 2)]),
            last_modified: Some(LastModified {
                file: "/sub/c.swift".into(),
                time,
            }),
            git_status: GitStatus::Repository(VcsStatus {
                branch: "main".into(),
                uncommitted_changes: Some(3),
                last_commit: "abc1234 Fix <script> escaping".into(),
            }),
        }),
    );
    projects.insert(
        "android".to_string(),
        Probed::Failed(ErrorNote::new("cannot read /work/FlexPort Android: not found")),
    );
    projects.insert(
        "web".to_string(),
        Probed::Ok(ProjectStats {
            file_counts: BTreeMap::from([("ts_files".to_string(), 0)]),
            last_modified: None,
            git_status: GitStatus::no_repository(),
        }),
    );
    Snapshot {
        timestamp: time,
        projects,
        system: Probed::Ok(SystemStats {
            agent_processes: 2,
            load_avg: [1.5, 1.25, 0.75],
        }),
        terminal_logs: BTreeMap::from([
            ("build.log".to_string(), vec!["one".to_string(), "two".to_string()]),
            ("empty.log".to_string(), vec![]),
        ]),
    }
}

#[test]
fn snapshot_json_shape() {
    let json = serde_json::to_value(sample_snapshot()).unwrap();

    assert!(json["timestamp"].is_string());
    assert_eq!(json["ios"]["swift_files"], 2);
    assert_eq!(json["ios"]["last_modified"]["file"], "/sub/c.swift");
    assert!(json["ios"]["last_modified"]["time"].is_string());
    assert_eq!(json["ios"]["git_status"]["branch"], "main");
    assert_eq!(json["ios"]["git_status"]["uncommitted_changes"], 3);
    assert!(json["android"]["error"].as_str().unwrap().contains("FlexPort Android"));
    assert_eq!(json["web"]["last_modified"], serde_json::Value::Null);
    assert_eq!(json["web"]["git_status"]["status"], "No git repository");
    assert_eq!(json["system"]["claude_processes"], 2);
    assert_eq!(json["system"]["load_avg"], serde_json::json!([1.5, 1.25, 0.75]));
    assert_eq!(json["terminal_logs"]["empty.log"], serde_json::json!([]));
    assert!(json.get("projects").is_none());
}

#[test]
fn snapshot_round_trips() {
    let snapshot = sample_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert_eq!(serde_json::to_string(&back).unwrap(), json);
}

#[test]
fn system_error_note_shape() {
    let system: Probed<SystemStats> =
        Probed::Failed(ErrorNote::new("process table unavailable: denied"));
    assert_eq!(
        serde_json::to_value(&system).unwrap(),
        serde_json::json!({ "error": "process table unavailable: denied" })
    );
}

#[test]
fn unknown_change_count_is_null() {
    let status = GitStatus::Repository(VcsStatus {
        branch: "unknown".into(),
        uncommitted_changes: None,
        last_commit: "No commits".into(),
    });
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["uncommitted_changes"], serde_json::Value::Null);
    let back: GitStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back, status);
}

#[test]
fn git_error_note_deserializes_as_unavailable() {
    let status: GitStatus =
        serde_json::from_str(r#"{"error": "git could not be started"}"#).unwrap();
    assert!(matches!(status, GitStatus::Unavailable(_)));
}

#[test]
fn other_status_strings_are_rejected() {
    let parsed = serde_json::from_str::<GitStatus>(r#"{"status": "clean"}"#);
    assert!(parsed.is_err());
}

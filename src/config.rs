use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::models::{RESERVED_KEYS, RESERVED_STAT_KEYS};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    pub projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Must be a loopback address; the dashboard is only reached through a tunnel.
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "127.0.0.1".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Base directory for relative project and log paths.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Case-insensitive substring matched against process names and command lines.
    #[serde(default = "default_process_pattern")]
    pub process_pattern: String,
    /// When set, a background task builds and logs a snapshot summary at this interval.
    #[serde(default)]
    pub summary_interval_secs: Option<u64>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            process_pattern: default_process_pattern(),
            summary_interval_secs: None,
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_process_pattern() -> String {
    "claude".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Key of this project in the snapshot JSON.
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub dir: PathBuf,
    /// Count key -> file name suffixes, e.g. `swift_files = [".swift"]`.
    pub file_classes: BTreeMap<String, Vec<String>>,
}

impl ProjectConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Union of all class suffixes, used for the last-modified search.
    pub fn all_suffixes(&self) -> Vec<String> {
        let mut out: Vec<String> = self.file_classes.values().flatten().cloned().collect();
        out.sort();
        out.dedup();
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_logs_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_log_suffixes")]
    pub suffixes: Vec<String>,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: default_logs_dir(),
            suffixes: default_log_suffixes(),
            tail_lines: default_tail_lines(),
        }
    }
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("terminal_logs")
}

fn default_log_suffixes() -> Vec<String> {
    vec![".log".into()]
}

fn default_tail_lines() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_git_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra attempts for a git call that timed out. Failed exits are not retried.
    #[serde(default = "default_git_retries")]
    pub retries: u32,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_git_timeout_ms(),
            retries: default_git_retries(),
        }
    }
}

fn default_git_timeout_ms() -> u64 {
    3000
}

fn default_git_retries() -> u32 {
    1
}

const MAX_GIT_RETRIES: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Log lines shown per file; the API still carries `logs.tail_lines`.
    #[serde(default = "default_render_lines")]
    pub render_lines: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            refresh_interval_secs: default_refresh_interval_secs(),
            render_lines: default_render_lines(),
        }
    }
}

fn default_title() -> String {
    "Project Activity Monitor".into()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_render_lines() -> usize {
    20
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn project_path(&self, project: &ProjectConfig) -> PathBuf {
        resolve(&self.monitoring.root_dir, &project.dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        resolve(&self.monitoring.root_dir, &self.logs.dir)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            is_loopback_host(&self.server.host),
            "server.host must be a loopback address, got {:?}",
            self.server.host
        );
        anyhow::ensure!(
            !self.projects.is_empty(),
            "projects must list at least one project"
        );

        let mut seen = HashSet::new();
        for project in &self.projects {
            anyhow::ensure!(
                !project.name.is_empty(),
                "projects.name must be non-empty"
            );
            anyhow::ensure!(
                !RESERVED_KEYS.contains(&project.name.as_str()),
                "projects.name {:?} is reserved",
                project.name
            );
            anyhow::ensure!(
                seen.insert(project.name.as_str()),
                "projects.name {:?} is duplicated",
                project.name
            );
            anyhow::ensure!(
                !project.file_classes.is_empty(),
                "projects.file_classes for {:?} must have at least one entry",
                project.name
            );
            for (key, suffixes) in &project.file_classes {
                anyhow::ensure!(
                    !RESERVED_STAT_KEYS.contains(&key.as_str()),
                    "projects.file_classes key {:?} in {:?} is reserved",
                    key,
                    project.name
                );
                anyhow::ensure!(
                    !suffixes.is_empty() && suffixes.iter().all(|s| !s.is_empty()),
                    "projects.file_classes.{} in {:?} must list non-empty suffixes",
                    key,
                    project.name
                );
            }
        }

        anyhow::ensure!(
            self.logs.tail_lines > 0,
            "logs.tail_lines must be > 0, got {}",
            self.logs.tail_lines
        );
        anyhow::ensure!(
            !self.logs.suffixes.is_empty() && self.logs.suffixes.iter().all(|s| !s.is_empty()),
            "logs.suffixes must list non-empty suffixes"
        );
        anyhow::ensure!(
            self.git.timeout_ms > 0,
            "git.timeout_ms must be > 0, got {}",
            self.git.timeout_ms
        );
        anyhow::ensure!(
            self.git.retries <= MAX_GIT_RETRIES,
            "git.retries must be <= {}, got {}",
            MAX_GIT_RETRIES,
            self.git.retries
        );
        anyhow::ensure!(
            self.dashboard.refresh_interval_secs > 0,
            "dashboard.refresh_interval_secs must be > 0, got {}",
            self.dashboard.refresh_interval_secs
        );
        anyhow::ensure!(
            self.dashboard.render_lines > 0 && self.dashboard.render_lines <= self.logs.tail_lines,
            "dashboard.render_lines must be between 1 and logs.tail_lines ({}), got {}",
            self.logs.tail_lines,
            self.dashboard.render_lines
        );
        if let Some(secs) = self.monitoring.summary_interval_secs {
            anyhow::ensure!(
                secs > 0,
                "monitoring.summary_interval_secs must be > 0, got {}",
                secs
            );
        }
        Ok(())
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn is_loopback_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

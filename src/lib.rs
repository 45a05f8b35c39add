// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fs_probe;
pub mod git_probe;
pub mod log_tailer;
pub mod models;
pub mod routes;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;

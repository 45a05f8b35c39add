// Package identity baked in at build time

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `name/version`, shown in the startup log and the dashboard footer.
pub fn banner() -> String {
    format!("{NAME}/{VERSION}")
}

//! Tracing setup.
//!
//! The interactive view owns the terminal, so logs go to a file there.
//! Export mode logs to stderr. `QUALITYWATCH_LOG` takes an `EnvFilter`
//! directive and wins over the configured filter.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "QUALITYWATCH_LOG";

/// Filter from `QUALITYWATCH_LOG`, falling back to `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Send logs to `path`, appending.
pub fn init_file(path: &Path, default_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

/// Send logs to stderr.
pub fn init_stderr(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_log_path_is_reported() {
        let err = init_file(Path::new("/nonexistent/dir/qw.log"), "info").unwrap_err();
        assert!(err.to_string().contains("opening log file"));
    }

    #[test]
    fn default_filter_applies_without_env() {
        if std::env::var(LOG_ENV).is_err() {
            assert_eq!(env_filter("warn").to_string(), "warn");
        }
    }
}

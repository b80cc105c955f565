//! Logging setup
//!
//! Until the configuration is read, events go to a scoped stderr subscriber
//! at WARN so configuration errors are still reported. Afterwards the global
//! subscriber is installed with the configured level and optional log file.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, registry};

use twod_core::config::LoggingConfig;

/// Subscriber used while the configuration is being loaded
pub fn bootstrap() -> impl Subscriber + Send + Sync {
    fmt()
        .with_writer(io::stderr)
        .with_max_level(LevelFilter::WARN)
        .finish()
}

/// Install the process-wide subscriber described by `[logging]`
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let level = LevelFilter::from_level(logging.level.as_tracing());

    let file_layer = match &logging.file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender(path)?),
        ),
        None => None,
    };

    registry()
        .with(level)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to set tracing subscriber")
}

/// Append-only writer for `path`, never rotated
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Cannot open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_appender_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twod.log");

        let _appender = file_appender(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_appender_needs_file_name() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}

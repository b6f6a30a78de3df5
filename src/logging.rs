//! Tracing subscriber setup
//!
//! The terminal belongs to the UI while it runs, so the binary logs to a
//! file. Records are handed to a background writer so the UI thread never
//! blocks on disk. `RUST_LOG` selects levels; without it everything at
//! `info` and above is written.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(default: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|err| Error::Logging(err.to_string()))
}

/// Append log records to `path`, creating it if needed.
///
/// Buffered records are flushed when the returned guard is dropped, so the
/// caller keeps it alive until exit.
pub fn init_file_logging(path: &Path) -> Result<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    let (writer, guard) = non_blocking(file);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter("info")?)
        .with(file_layer)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(guard)
}

static TEST_LOGGING_INIT: Once = Once::new();

/// Console logging for tests; safe to call from every test.
pub fn init_test_logging() {
    TEST_LOGGING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .compact()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_names_the_path() {
        let path = Path::new("/nonexistent-heapview-dir/heapview.log");
        let err = init_file_logging(path).unwrap_err();

        assert!(matches!(&err, Error::LogFile { path: p, .. } if p == path));
        assert!(err.to_string().starts_with("failed to open log file /nonexistent-heapview-dir/heapview.log"));
    }
}

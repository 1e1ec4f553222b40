//! File-based tracing setup. The terminal belongs to the TUI, so nothing is
//! written to stdout or stderr.

use crate::error::{ApproveError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "approveit=info";
const VERBOSE_LOG_FILTER: &str = "approveit=debug";

const LOG_FILE_PREFIX: &str = "approveit";
const LOG_FILE_SUFFIX: &str = "log";
/// Daily files kept before the oldest is deleted
const MAX_LOG_FILES: usize = 7;

/// Directory holding the log files (~/.local/share/approveit on Linux)
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("approveit"))
}

/// Daily rotating appender that keeps at most [`MAX_LOG_FILES`] files in `dir`
fn rolling_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| ApproveError::ConfigError(format!("Failed to open log file: {}", e)))
}

/// Installs the global subscriber and returns the log directory.
///
/// `RUST_LOG` takes precedence over `verbose`. Buffered lines are flushed
/// when the returned guard is dropped, so keep it alive until exit.
pub fn init_logging(verbose: bool) -> Result<(PathBuf, WorkerGuard)> {
    let dir = log_dir().ok_or_else(|| {
        ApproveError::ConfigError("Could not determine data directory".to_string())
    })?;
    fs::create_dir_all(&dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling_appender(&dir)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| ApproveError::ConfigError(format!("Failed to install logger: {}", e)))?;

    Ok((dir, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_rolling_appender_writes_dated_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut appender = rolling_appender(temp_dir.path()).unwrap();

        appender.write_all(b"session opened\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("approveit."));
        assert!(names[0].ends_with(".log"));
    }
}

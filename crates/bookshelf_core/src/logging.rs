//! Rolling file logs for library processes.
//!
//! # Invariants
//! - The logger is started at most once per process; later calls are no-ops.
//! - Log events carry ids, counts and durations, never titles or authors.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "bookshelf";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    Io { path: PathBuf, source: std::io::Error },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected off|error|warn|info|debug|trace"
            ),
            Self::Io { path, source } => {
                write!(f, "cannot use log directory `{}`: {source}", path.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLevel(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
        }
    }
}

/// Starts size-rotated file logging under `log_dir`.
///
/// Returns `Ok(())` without reconfiguring when a logger is already running.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let log_dir = log_dir.as_ref();

    LOGGER.get_or_try_init(|| -> Result<LoggerHandle, LoggingError> {
        std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let handle = Logger::with(LogSpecification::builder().default(level).build())
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            // One short operation per process; flush as we go.
            .write_mode(WriteMode::Direct)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(LoggingError::Backend)?;

        info!(
            "event=logging_init module=logging status=ok level={} platform={} version={}",
            level,
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION")
        );
        Ok(handle)
    })?;

    Ok(())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = level.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "warning" => Ok(LevelFilter::Warn),
        other => LevelFilter::from_str(other)
            .map_err(|_| LoggingError::InvalidLevel(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{default_log_level, init_logging, parse_level, LoggingError};
    use log::LevelFilter;

    #[test]
    fn parse_level_is_case_insensitive_and_accepts_warning() {
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::Warn);
        assert!(parse_level(default_log_level()).is_ok());
    }

    #[test]
    fn invalid_level_is_rejected_before_touching_disk() {
        let root = tempfile::tempdir().unwrap();
        let log_dir = root.path().join("never-created");

        let err = init_logging("verbose", &log_dir).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel(level) if level == "verbose"));
        assert!(!log_dir.exists());
    }

    #[test]
    fn init_logging_creates_directory_and_later_calls_are_noops() {
        let root = tempfile::tempdir().unwrap();
        let log_dir = root.path().join("logs");

        init_logging("info", &log_dir).unwrap();
        assert!(log_dir.is_dir());

        init_logging("debug", root.path().join("elsewhere")).unwrap();
        assert!(!root.path().join("elsewhere").exists());
    }
}

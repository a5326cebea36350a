//! Runtime configuration for library callers.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level.
//! - Apply precedence: explicit value, then environment, then default.
//!
//! # Invariants
//! - Resolution never touches the file system; see [`LibraryConfig::prepare_dirs`].

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "bookshelf";
/// Database file name inside the app directory.
pub const DB_FILE_NAME: &str = "library.db";
/// Log directory name inside the app directory.
pub const LOG_DIR_NAME: &str = "logs";

pub const ENV_DB_PATH: &str = "BOOKSHELF_DB";
pub const ENV_LOG_DIR: &str = "BOOKSHELF_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "BOOKSHELF_LOG_LEVEL";

#[derive(Debug)]
pub enum ConfigError {
    /// No platform data directory and no explicit path was provided.
    NoDataDir,
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "could not determine a data directory; pass an explicit database path"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Explicit overrides, typically parsed from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl LibraryConfig {
    /// Resolves configuration from overrides, process environment and defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok(), dirs::data_dir())
    }

    /// Resolves configuration with an injected environment lookup and data dir.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let env_path = |key: &str| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let app_dir = data_dir.map(|dir| dir.join(APP_DIR_NAME));

        let db_path = match overrides.db_path.or_else(|| env_path(ENV_DB_PATH)) {
            Some(path) => path,
            None => app_dir
                .as_ref()
                .map(|dir| dir.join(DB_FILE_NAME))
                .ok_or(ConfigError::NoDataDir)?,
        };

        let log_dir = match overrides.log_dir.or_else(|| env_path(ENV_LOG_DIR)) {
            Some(path) => path,
            None => match &app_dir {
                Some(dir) => dir.join(LOG_DIR_NAME),
                None => db_parent(&db_path).join(LOG_DIR_NAME),
            },
        };

        let log_level = overrides
            .log_level
            .or_else(|| env(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }

    /// Creates the database parent directory and the log directory.
    pub fn prepare_dirs(&self) -> Result<(), ConfigError> {
        for dir in [db_parent(&self.db_path), self.log_dir.clone()] {
            std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn db_parent(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ConfigOverrides, LibraryConfig, ENV_DB_PATH, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_under_data_dir() {
        let config = LibraryConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[]),
            Some(PathBuf::from("/data")),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/bookshelf/library.db"));
        assert_eq!(config.log_dir, PathBuf::from("/data/bookshelf/logs"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn overrides_win_over_environment() {
        let overrides = ConfigOverrides {
            db_path: Some(PathBuf::from("/flag/books.db")),
            log_level: Some("warn".to_string()),
            ..ConfigOverrides::default()
        };
        let config = LibraryConfig::resolve_with(
            overrides,
            env_of(&[(ENV_DB_PATH, "/env/books.db"), (ENV_LOG_LEVEL, "trace")]),
            Some(PathBuf::from("/data")),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/flag/books.db"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn environment_wins_over_defaults() {
        let config = LibraryConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[(ENV_DB_PATH, "/env/books.db"), (ENV_LOG_LEVEL, "trace")]),
            Some(PathBuf::from("/data")),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/env/books.db"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn missing_data_dir_requires_explicit_db_path() {
        let err = LibraryConfig::resolve_with(ConfigOverrides::default(), env_of(&[]), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoDataDir));

        let config = LibraryConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[(ENV_DB_PATH, "/env/books.db")]),
            None,
        )
        .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/env/logs"));
    }
}

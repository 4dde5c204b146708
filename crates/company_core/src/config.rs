//! Store and logging configuration.
//!
//! # Responsibility
//! - Parse the connection string that selects the backing database.
//! - Carry logging settings into `init_logging`.
//!
//! # Invariants
//! - A parsed `StoreConfig` always names a concrete target.
//! - Parsing never touches the file system.

use std::env::VarError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable holding the connection string.
pub const CONNECTION_STRING_ENV: &str = "COMPANY_DB_URL";
/// Connection string used when `COMPANY_DB_URL` is unset.
pub const DEFAULT_CONNECTION_STRING: &str = "sqlite::memory:";

const SQLITE_MEMORY: &str = "sqlite::memory:";
const SQLITE_FILE_PREFIX: &str = "sqlite://";
const MEMORY_DATABASE_NAME: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Empty,
    UnsupportedScheme(String),
    EmptyPath,
    /// `COMPANY_DB_URL` is set but not valid UTF-8.
    NotUnicode,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "connection string cannot be empty"),
            Self::UnsupportedScheme(value) => write!(
                f,
                "unsupported connection string `{value}`; expected `{SQLITE_MEMORY}` or `{SQLITE_FILE_PREFIX}<path>`"
            ),
            Self::EmptyPath => write!(f, "connection string has an empty database path"),
            Self::NotUnicode => write!(f, "{CONNECTION_STRING_ENV} is not valid UTF-8"),
        }
    }
}

impl Error for ConfigError {}

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    File(PathBuf),
}

/// Parsed connection settings for `Store::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub target: StoreTarget,
    /// File stem of the database file, or `memory`.
    pub database_name: String,
}

impl StoreConfig {
    /// Parses `sqlite::memory:` or `sqlite://<path>`.
    pub fn parse(connection_string: &str) -> Result<Self, ConfigError> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty);
        }

        if trimmed == SQLITE_MEMORY {
            return Ok(Self::in_memory());
        }

        let Some(raw_path) = trimmed.strip_prefix(SQLITE_FILE_PREFIX) else {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        };
        if raw_path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        Ok(Self::file(raw_path))
    }

    /// Reads the connection string from `COMPANY_DB_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(CONNECTION_STRING_ENV))
    }

    fn from_env_value(value: Result<String, VarError>) -> Result<Self, ConfigError> {
        match value {
            Ok(value) => Self::parse(&value),
            Err(VarError::NotPresent) => Self::parse(DEFAULT_CONNECTION_STRING),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            target: StoreTarget::Memory,
            database_name: MEMORY_DATABASE_NAME.to_string(),
        }
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let database_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            target: StoreTarget::File(path),
            database_name,
        }
    }

    /// Mode label used in log lines.
    pub fn mode(&self) -> &'static str {
        match self.target {
            StoreTarget::Memory => "memory",
            StoreTarget::File(_) => "file",
        }
    }
}

/// Logging settings for `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory receiving rolling log files.
    pub log_dir: PathBuf,
}

impl LogConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }

    /// Uses the build-mode default level.
    pub fn with_default_level(log_dir: impl Into<PathBuf>) -> Self {
        Self::new(crate::logging::default_log_level(), log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LogConfig, StoreConfig, StoreTarget, CONNECTION_STRING_ENV};
    use std::env::VarError;
    use std::ffi::OsString;
    use std::path::PathBuf;

    #[test]
    fn parses_memory_target() {
        let config = StoreConfig::parse(" sqlite::memory: ").unwrap();
        assert_eq!(config.target, StoreTarget::Memory);
        assert_eq!(config.database_name, "memory");
        assert_eq!(config.mode(), "memory");
    }

    #[test]
    fn parses_file_target_and_database_name() {
        let config = StoreConfig::parse("sqlite:///var/data/companyDBtest.sqlite3").unwrap();
        assert_eq!(
            config.target,
            StoreTarget::File(PathBuf::from("/var/data/companyDBtest.sqlite3"))
        );
        assert_eq!(config.database_name, "companyDBtest");
        assert_eq!(config.mode(), "file");
    }

    #[test]
    fn from_env_reads_connection_string_or_falls_back_to_memory() {
        std::env::set_var(CONNECTION_STRING_ENV, "sqlite://./data/companyDB.db");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.database_name, "companyDB");

        std::env::remove_var(CONNECTION_STRING_ENV);
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.target, StoreTarget::Memory);
    }

    #[test]
    fn non_unicode_env_value_is_an_error_not_a_fallback() {
        let err =
            StoreConfig::from_env_value(Err(VarError::NotUnicode(OsString::from("bad"))))
                .unwrap_err();
        assert_eq!(err, ConfigError::NotUnicode);

        let config = StoreConfig::from_env_value(Err(VarError::NotPresent)).unwrap();
        assert_eq!(config.target, StoreTarget::Memory);
    }

    #[test]
    fn log_config_uses_build_default_level() {
        let config = LogConfig::with_default_level("/tmp/company-logs");
        assert_eq!(config.level, crate::logging::default_log_level());
        assert_eq!(config.log_dir, PathBuf::from("/tmp/company-logs"));
    }

    #[test]
    fn rejects_unknown_schemes_and_empty_input() {
        assert_eq!(StoreConfig::parse("  ").unwrap_err(), ConfigError::Empty);
        assert_eq!(
            StoreConfig::parse("sqlite://").unwrap_err(),
            ConfigError::EmptyPath
        );
        assert!(matches!(
            StoreConfig::parse("mongodb://localhost:27017/companyDB").unwrap_err(),
            ConfigError::UnsupportedScheme(_)
        ));
    }
}

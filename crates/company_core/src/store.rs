//! Store handle owning the database connection.
//!
//! # Responsibility
//! - Open a migrated connection from a `StoreConfig` or connection string.
//! - Hand out repositories that borrow the connection.
//! - Close the connection explicitly.
//!
//! # Invariants
//! - Repositories cannot outlive the `Store` they were borrowed from.
//! - Several stores may be open at once; they share no state.

use crate::config::{ConfigError, StoreConfig, StoreTarget};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::repo::department_repo::SqliteDepartmentRepository;
use crate::repo::employee_repo::SqliteEmployeeRepository;
use crate::repo::RepoResult;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Open department/employee store.
pub struct Store {
    conn: Connection,
    config: StoreConfig,
}

impl Store {
    /// Opens the store described by `config` and applies migrations.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let opened = match &config.target {
            StoreTarget::Memory => open_db_in_memory(),
            StoreTarget::File(path) => open_db(path),
        };

        match opened {
            Ok(conn) => {
                info!(
                    "event=store_open module=store status=ok mode={} database={}",
                    config.mode(),
                    config.database_name
                );
                Ok(Self {
                    conn,
                    config: config.clone(),
                })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error mode={} database={} error={err}",
                    config.mode(),
                    config.database_name
                );
                Err(err.into())
            }
        }
    }

    /// Parses `connection_string` and opens the store it names.
    pub fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let config = StoreConfig::parse(connection_string)?;
        Self::open(&config)
    }

    /// Opens an isolated in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Raw connection, for callers that need SQL outside the repositories.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn departments(&self) -> RepoResult<SqliteDepartmentRepository<'_>> {
        SqliteDepartmentRepository::try_new(&self.conn)
    }

    pub fn employees(&self) -> RepoResult<SqliteEmployeeRepository<'_>> {
        SqliteEmployeeRepository::try_new(&self.conn)
    }

    /// Closes the connection, surfacing any error SQLite reports.
    pub fn close(self) -> DbResult<()> {
        let database = self.config.database_name;
        self.conn.close().map_err(|(_, err)| {
            error!("event=store_close module=store status=error database={database} error={err}");
            DbError::from(err)
        })?;
        info!("event=store_close module=store status=ok database={database}");
        Ok(())
    }
}

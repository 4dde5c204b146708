//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define CRUD contracts for departments and employees.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate candidates before any SQL mutation.
//! - Reads and mutations that match nothing return empty results, not errors.
//! - "First match" always means lowest insertion sequence.

pub mod department_repo;
pub mod employee_repo;
pub mod error;
mod filter;

use rusqlite::Connection;

pub use error::{RepoError, RepoResult};

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

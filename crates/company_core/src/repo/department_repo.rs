//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create` and `rename` validate the name before writing.
//! - Caller-provided ids must not collide with an existing department.

use crate::model::department::{Department, NewDepartment, FIELD_NAME};
use crate::model::id::RecordId;
use crate::model::validation::{check_text, ValidationError};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name FROM Department";

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    /// Persists a department, generating an id unless one is provided.
    fn create(&self, department: &NewDepartment) -> RepoResult<Department>;
    /// Lists every department in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Department>>;
    fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Department>>;
    /// Changes the name; returns `false` when no department has `id`.
    fn rename(&self, id: &RecordId, name: &str) -> RepoResult<bool>;
    fn delete_by_id(&self, id: &RecordId) -> RepoResult<bool>;
    /// Removes every department and returns how many were removed.
    fn delete_all(&self) -> RepoResult<u64>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["Department"])?;
        Ok(Self { conn })
    }

    fn id_exists(&self, id: &RecordId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM Department WHERE id = ?1);",
            [id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create(&self, department: &NewDepartment) -> RepoResult<Department> {
        department.validate()?;

        let id = match department.id.clone() {
            Some(id) => {
                if self.id_exists(&id)? {
                    return Err(RepoError::DuplicateId(id));
                }
                id
            }
            None => RecordId::generate(),
        };

        self.conn.execute(
            "INSERT INTO Department (id, name) VALUES (?1, ?2);",
            params![id.as_str(), department.name.as_str()],
        )?;
        debug!("event=department_create module=repo status=ok id={id}");

        Ok(Department {
            id,
            name: department.name.clone(),
        })
    }

    fn find_all(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }

    fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn rename(&self, id: &RecordId, name: &str) -> RepoResult<bool> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, FIELD_NAME, name);
        errors.into_result(())?;

        let changed = self.conn.execute(
            "UPDATE Department SET name = ?1 WHERE id = ?2;",
            params![name, id.as_str()],
        )?;
        debug!("event=department_rename module=repo status=ok id={id} matched={changed}");
        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: &RecordId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM Department WHERE id = ?1;", [id.as_str()])?;
        debug!("event=department_delete module=repo status=ok id={id} deleted={changed}");
        Ok(changed > 0)
    }

    fn delete_all(&self) -> RepoResult<u64> {
        let changed = self.conn.execute("DELETE FROM Department;", [])?;
        debug!("event=department_delete_all module=repo status=ok deleted={changed}");
        Ok(changed as u64)
    }
}

/// Reads a department from a row selecting `id, name`.
pub(crate) fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    let id_text: String = row.get("id")?;
    let id = RecordId::parse(id_text.as_str()).map_err(|err| {
        RepoError::InvalidData(format!("invalid id `{id_text}` in Department.id: {err}"))
    })?;

    let department = Department {
        id,
        name: row.get("name")?,
    };
    department
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("Department row {}: {err}", department.id)))?;
    Ok(department)
}

//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide filter-based CRUD over the `Employee` table.
//! - Resolve department references on request with a left join.
//!
//! # Invariants
//! - `create` and `save` validate the full record; updates validate every
//!   field they set.
//! - Single-record mutations target the first match by insertion order and
//!   run as one statement.
//! - A dangling department reference is never an error.

use crate::model::department::Department;
use crate::model::employee::{
    Employee, EmployeeChanges, EmployeeFilter, EmployeeRows, NewEmployee, Populate,
    PopulatedEmployee,
};
use crate::model::id::RecordId;
use crate::repo::filter::{employee_seq_subquery, employee_set_clause, push_employee_where};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    e.id,
    e.first_name,
    e.last_name,
    e.department_id
FROM Employee e";

const POPULATED_SELECT_SQL: &str = "SELECT
    e.id,
    e.first_name,
    e.last_name,
    e.department_id,
    d.id AS department_ref_id,
    d.name AS department_name
FROM Employee e
LEFT JOIN Department d ON d.id = e.department_id";

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    /// Validates and persists a new employee with a generated id.
    fn create(&self, employee: &NewEmployee) -> RepoResult<Employee>;
    /// Lists matching employees with raw department references.
    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    /// Lists matching employees with department references resolved.
    fn find_all_populated(&self, filter: &EmployeeFilter) -> RepoResult<Vec<PopulatedEmployee>>;
    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    fn find_one_populated(&self, filter: &EmployeeFilter)
        -> RepoResult<Option<PopulatedEmployee>>;
    fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64>;
    /// Applies `changes` to the first match. Returns `false` when nothing matched.
    fn update_one(&self, filter: &EmployeeFilter, changes: &EmployeeChanges) -> RepoResult<bool>;
    /// Applies `changes` to every match and returns the match count.
    fn update_many(&self, filter: &EmployeeFilter, changes: &EmployeeChanges) -> RepoResult<u64>;
    /// Re-validates a fetched (and possibly mutated) record and writes it back by id.
    fn save(&self, employee: &Employee) -> RepoResult<bool>;
    /// Removes the first match. Returns `false` when nothing matched.
    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<bool>;
    /// Removes every match; `EmployeeFilter::all()` clears the collection.
    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<u64>;

    /// Lists matching employees in the shape selected by `populate`.
    fn find(&self, filter: &EmployeeFilter, populate: Populate) -> RepoResult<EmployeeRows> {
        match populate {
            Populate::None => self.find_all(filter).map(EmployeeRows::Raw),
            Populate::Department => self.find_all_populated(filter).map(EmployeeRows::Populated),
        }
    }

    /// Deletes a previously fetched record by its id.
    fn remove(&self, employee: &Employee) -> RepoResult<bool> {
        self.delete_one(&EmployeeFilter::by_id(employee.id.clone()))
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// `Department` must exist too since populated reads join it.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["Employee", "Department"])?;
        Ok(Self { conn })
    }

    fn query_employees(
        &self,
        filter: &EmployeeFilter,
        limit_one: bool,
    ) -> RepoResult<Vec<Employee>> {
        let mut sql = String::from(EMPLOYEE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        push_employee_where(&mut sql, &mut bind_values, filter);
        push_order(&mut sql, limit_one);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn query_populated(
        &self,
        filter: &EmployeeFilter,
        limit_one: bool,
    ) -> RepoResult<Vec<PopulatedEmployee>> {
        let mut sql = String::from(POPULATED_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        push_employee_where(&mut sql, &mut bind_values, filter);
        push_order(&mut sql, limit_one);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_populated_row(row)?);
        }
        Ok(employees)
    }

    fn apply_changes(
        &self,
        filter: &EmployeeFilter,
        changes: &EmployeeChanges,
        first_only: bool,
    ) -> RepoResult<u64> {
        changes.validate()?;

        let mut bind_values: Vec<Value> = Vec::new();
        let Some(assignments) = employee_set_clause(&mut bind_values, changes) else {
            // Nothing to write; report what would have matched.
            let matched = self.count(filter)?;
            return Ok(if first_only { matched.min(1) } else { matched });
        };
        let subquery = employee_seq_subquery(&mut bind_values, filter, first_only);

        let changed = self.conn.execute(
            &format!("UPDATE Employee SET {assignments} WHERE seq IN ({subquery});"),
            params_from_iter(bind_values),
        )?;
        Ok(changed as u64)
    }

    fn delete_matching(&self, filter: &EmployeeFilter, first_only: bool) -> RepoResult<u64> {
        let mut bind_values: Vec<Value> = Vec::new();
        let subquery = employee_seq_subquery(&mut bind_values, filter, first_only);
        let changed = self.conn.execute(
            &format!("DELETE FROM Employee WHERE seq IN ({subquery});"),
            params_from_iter(bind_values),
        )?;
        Ok(changed as u64)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create(&self, employee: &NewEmployee) -> RepoResult<Employee> {
        employee.validate()?;

        let created = employee.clone().into_employee(RecordId::generate());
        self.conn.execute(
            "INSERT INTO Employee (id, first_name, last_name, department_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                created.id.as_str(),
                created.first_name.as_str(),
                created.last_name.as_str(),
                created.department_id.as_str(),
            ],
        )?;
        debug!(
            "event=employee_create module=repo status=ok id={} department_id={}",
            created.id, created.department_id
        );

        Ok(created)
    }

    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.query_employees(filter, false)
    }

    fn find_all_populated(&self, filter: &EmployeeFilter) -> RepoResult<Vec<PopulatedEmployee>> {
        self.query_populated(filter, false)
    }

    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        Ok(self.query_employees(filter, true)?.into_iter().next())
    }

    fn find_one_populated(
        &self,
        filter: &EmployeeFilter,
    ) -> RepoResult<Option<PopulatedEmployee>> {
        Ok(self.query_populated(filter, true)?.into_iter().next())
    }

    fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM Employee e");
        let mut bind_values: Vec<Value> = Vec::new();
        push_employee_where(&mut sql, &mut bind_values, filter);

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(count as u64)
    }

    fn update_one(&self, filter: &EmployeeFilter, changes: &EmployeeChanges) -> RepoResult<bool> {
        let changed = self.apply_changes(filter, changes, true)?;
        debug!("event=employee_update_one module=repo status=ok matched={changed}");
        Ok(changed > 0)
    }

    fn update_many(&self, filter: &EmployeeFilter, changes: &EmployeeChanges) -> RepoResult<u64> {
        let changed = self.apply_changes(filter, changes, false)?;
        debug!("event=employee_update_many module=repo status=ok matched={changed}");
        Ok(changed)
    }

    fn save(&self, employee: &Employee) -> RepoResult<bool> {
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE Employee
             SET
                first_name = ?1,
                last_name = ?2,
                department_id = ?3
             WHERE id = ?4;",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department_id.as_str(),
                employee.id.as_str(),
            ],
        )?;
        debug!(
            "event=employee_save module=repo status=ok id={} matched={changed}",
            employee.id
        );
        Ok(changed > 0)
    }

    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<bool> {
        let deleted = self.delete_matching(filter, true)?;
        debug!("event=employee_delete_one module=repo status=ok deleted={deleted}");
        Ok(deleted > 0)
    }

    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let deleted = self.delete_matching(filter, false)?;
        debug!("event=employee_delete_many module=repo status=ok deleted={deleted}");
        Ok(deleted)
    }
}

fn push_order(sql: &mut String, limit_one: bool) {
    sql.push_str(" ORDER BY e.seq ASC");
    if limit_one {
        sql.push_str(" LIMIT 1");
    }
}

fn parse_record_id(row: &Row<'_>, column: &str) -> RepoResult<RecordId> {
    let text: String = row.get(column)?;
    RecordId::parse(text.as_str()).map_err(|err| {
        RepoError::InvalidData(format!("invalid id `{text}` in Employee.{column}: {err}"))
    })
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let employee = Employee {
        id: parse_record_id(row, "id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        department_id: parse_record_id(row, "department_id")?,
    };
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("Employee row {}: {err}", employee.id)))?;
    Ok(employee)
}

fn parse_populated_row(row: &Row<'_>) -> RepoResult<PopulatedEmployee> {
    let employee = parse_employee_row(row)?;

    let department = match (
        row.get::<_, Option<String>>("department_ref_id")?,
        row.get::<_, Option<String>>("department_name")?,
    ) {
        (Some(_), Some(name)) => {
            let department = Department {
                id: employee.department_id.clone(),
                name,
            };
            department.validate().map_err(|err| {
                RepoError::InvalidData(format!("Department row {}: {err}", department.id))
            })?;
            Some(department)
        }
        _ => None,
    };

    Ok(PopulatedEmployee {
        id: employee.id,
        first_name: employee.first_name,
        last_name: employee.last_name,
        department_id: employee.department_id,
        department,
    })
}

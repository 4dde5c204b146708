//! SQL fragments for employee filters and change sets.
//!
//! Fragments use anonymous `?` placeholders; callers must bind values in the
//! order the fragments were appended.

use crate::model::employee::{EmployeeChanges, EmployeeFilter};
use rusqlite::types::Value;

/// Appends ` WHERE ...` for `filter` against table alias `e`.
pub(crate) fn push_employee_where(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    filter: &EmployeeFilter,
) {
    sql.push_str(" WHERE 1 = 1");

    let columns = [
        ("e.id", filter.id.as_ref().map(|id| id.as_str())),
        ("e.first_name", filter.first_name.as_deref()),
        ("e.last_name", filter.last_name.as_deref()),
        (
            "e.department_id",
            filter.department_id.as_ref().map(|id| id.as_str()),
        ),
    ];
    for (column, value) in columns {
        if let Some(value) = value {
            sql.push_str(" AND ");
            sql.push_str(column);
            sql.push_str(" = ?");
            bind_values.push(Value::Text(value.to_string()));
        }
    }
}

/// Subquery selecting the `seq` of every employee matching `filter`.
///
/// With `first_only`, only the lowest `seq` is selected.
pub(crate) fn employee_seq_subquery(
    bind_values: &mut Vec<Value>,
    filter: &EmployeeFilter,
    first_only: bool,
) -> String {
    let mut sql = String::from("SELECT e.seq FROM Employee e");
    push_employee_where(&mut sql, bind_values, filter);
    if first_only {
        sql.push_str(" ORDER BY e.seq ASC LIMIT 1");
    }
    sql
}

/// Builds `first_name = ?, ...` for every field set in `changes`.
///
/// Returns `None` for an empty change set.
pub(crate) fn employee_set_clause(
    bind_values: &mut Vec<Value>,
    changes: &EmployeeChanges,
) -> Option<String> {
    let columns = [
        ("first_name", changes.first_name.as_deref()),
        ("last_name", changes.last_name.as_deref()),
        (
            "department_id",
            changes.department_id.as_ref().map(|id| id.as_str()),
        ),
    ];

    let mut assignments = Vec::new();
    for (column, value) in columns {
        if let Some(value) = value {
            assignments.push(format!("{column} = ?"));
            bind_values.push(Value::Text(value.to_string()));
        }
    }

    if assignments.is_empty() {
        None
    } else {
        Some(assignments.join(", "))
    }
}

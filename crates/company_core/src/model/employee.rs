//! Employee record and its read/write shapes.
//!
//! # Responsibility
//! - Define the persisted employee, the candidate used for creation and the
//!   partial change set used by updates.
//! - Define the populated read shape where the department reference is
//!   resolved into a full `Department`.
//!
//! # Invariants
//! - `first_name` and `last_name` are never blank once persisted.
//! - `department_id` is stored as a raw reference; it is not required to
//!   point at an existing department.

use crate::model::department::Department;
use crate::model::id::RecordId;
use crate::model::validation::{as_object, check_text, take_id, take_text, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_DEPARTMENT_ID: &str = "departmentId";

/// Persisted employee with a raw department reference.
///
/// Deserialization runs `validate`, so blank names are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EmployeeFields")]
pub struct Employee {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub department_id: RecordId,
}

impl Employee {
    /// Full-record validation, run again by `save`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, FIELD_FIRST_NAME, &self.first_name);
        check_text(&mut errors, FIELD_LAST_NAME, &self.last_name);
        errors.into_result(())
    }
}

/// Candidate employee before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NewEmployeeFields")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub department_id: RecordId,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department_id: RecordId,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            department_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, FIELD_FIRST_NAME, &self.first_name);
        check_text(&mut errors, FIELD_LAST_NAME, &self.last_name);
        errors.into_result(())
    }

    pub(crate) fn into_employee(self, id: RecordId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            department_id: self.department_id,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeFields {
    id: RecordId,
    first_name: String,
    last_name: String,
    department_id: RecordId,
}

impl TryFrom<EmployeeFields> for Employee {
    type Error = ValidationError;

    fn try_from(fields: EmployeeFields) -> Result<Self, Self::Error> {
        let employee = Self {
            id: fields.id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            department_id: fields.department_id,
        };
        employee.validate()?;
        Ok(employee)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewEmployeeFields {
    first_name: String,
    last_name: String,
    department_id: RecordId,
}

impl TryFrom<NewEmployeeFields> for NewEmployee {
    type Error = ValidationError;

    fn try_from(fields: NewEmployeeFields) -> Result<Self, Self::Error> {
        let employee = Self::new(fields.first_name, fields.last_name, fields.department_id);
        employee.validate()?;
        Ok(employee)
    }
}

/// Validates an untyped employee document.
///
/// Every required field is checked so the error lists all failures at once.
pub fn validate_employee_document(candidate: &Value) -> Result<NewEmployee, ValidationError> {
    let document = as_object(candidate)?;
    let mut errors = ValidationError::new();

    let first_name = take_text(&mut errors, document, FIELD_FIRST_NAME);
    let last_name = take_text(&mut errors, document, FIELD_LAST_NAME);
    let department_id = take_id(&mut errors, document, FIELD_DEPARTMENT_ID);

    match (first_name, last_name, department_id) {
        (Some(first_name), Some(last_name), Some(department_id)) if errors.is_empty() => {
            Ok(NewEmployee {
                first_name,
                last_name,
                department_id,
            })
        }
        _ => Err(errors),
    }
}

/// Partial update applied by `update_one`, `update_many`.
///
/// Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
}

impl EmployeeChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department_id(mut self, value: RecordId) -> Self {
        self.department_id = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.department_id.is_none()
    }

    /// Validates only the fields being set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if let Some(first_name) = self.first_name.as_deref() {
            check_text(&mut errors, FIELD_FIRST_NAME, first_name);
        }
        if let Some(last_name) = self.last_name.as_deref() {
            check_text(&mut errors, FIELD_LAST_NAME, last_name);
        }
        errors.into_result(())
    }
}

/// Exact-match predicate over employee fields, combined with AND.
///
/// The default value matches every employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub id: Option<RecordId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department_id: Option<RecordId>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: RecordId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department_id(mut self, value: RecordId) -> Self {
        self.department_id = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.department_id.is_none()
    }
}

/// Employee read with its department reference resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedEmployee {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    /// Raw reference, kept even when it does not resolve.
    pub department_id: RecordId,
    /// `None` when no department with `department_id` exists.
    pub department: Option<Department>,
}

impl PopulatedEmployee {
    /// Drops the resolved department and returns the stored shape.
    pub fn into_employee(self) -> Employee {
        Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            department_id: self.department_id,
        }
    }
}

/// Whether reads resolve the department reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Populate {
    #[default]
    None,
    Department,
}

/// Result of `find`, shaped by the requested `Populate` mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeRows {
    Raw(Vec<Employee>),
    Populated(Vec<PopulatedEmployee>),
}

impl EmployeeRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(rows) => rows.len(),
            Self::Populated(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

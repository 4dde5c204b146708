//! Department record.
//!
//! # Invariants
//! - `name` is never blank once persisted.
//! - `id` is stable for the lifetime of the record.

use crate::model::id::RecordId;
use crate::model::validation::{as_object, check_text, take_id, take_text, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";

/// Persisted department.
///
/// Deserialization runs `validate`, so a blank name is rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepartmentFields")]
pub struct Department {
    pub id: RecordId,
    pub name: String,
}

impl Department {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, FIELD_NAME, &self.name);
        errors.into_result(())
    }
}

/// Candidate department before persistence.
///
/// `id` is normally left `None` so the store assigns one; import paths set
/// it to keep an identifier that already exists elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewDepartmentFields")]
pub struct NewDepartment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, FIELD_NAME, &self.name);
        errors.into_result(())
    }
}

#[derive(Deserialize)]
struct DepartmentFields {
    id: RecordId,
    name: String,
}

impl TryFrom<DepartmentFields> for Department {
    type Error = ValidationError;

    fn try_from(fields: DepartmentFields) -> Result<Self, Self::Error> {
        let department = Self {
            id: fields.id,
            name: fields.name,
        };
        department.validate()?;
        Ok(department)
    }
}

#[derive(Deserialize)]
struct NewDepartmentFields {
    #[serde(default)]
    id: Option<RecordId>,
    name: String,
}

impl TryFrom<NewDepartmentFields> for NewDepartment {
    type Error = ValidationError;

    fn try_from(fields: NewDepartmentFields) -> Result<Self, Self::Error> {
        let department = Self {
            id: fields.id,
            name: fields.name,
        };
        department.validate()?;
        Ok(department)
    }
}

/// Validates an untyped department document.
///
/// An `id` key is optional; when present it must be a usable identifier.
pub fn validate_department_document(candidate: &Value) -> Result<NewDepartment, ValidationError> {
    let document = as_object(candidate)?;
    let mut errors = ValidationError::new();

    let id = match document.get(FIELD_ID) {
        None | Some(Value::Null) => None,
        Some(_) => take_id(&mut errors, document, FIELD_ID),
    };
    let name = take_text(&mut errors, document, FIELD_NAME);

    match name {
        Some(name) if errors.is_empty() => Ok(NewDepartment { id, name }),
        _ => Err(errors),
    }
}

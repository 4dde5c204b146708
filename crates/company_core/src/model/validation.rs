//! Field-level validation shared by all record types.
//!
//! # Responsibility
//! - Collect every invalid field of a candidate record into one error.
//! - Classify untyped JSON candidates (wrong type, missing, blank).
//!
//! # Invariants
//! - Validation is pure: it never touches the store.
//! - An empty `ValidationError` is never returned as an `Err`.

use crate::model::id::{RecordId, RecordIdError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pseudo field used when the candidate itself is not a JSON object.
pub const DOCUMENT_FIELD: &str = "document";

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is absent or `null`.
    Missing,
    /// Field is a string but empty after trimming.
    Blank,
    /// Field holds a value of the wrong JSON type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// Identifier field is a string but not a usable identifier.
    InvalidIdentifier(String),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::Blank => write!(f, "cannot be blank"),
            Self::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::InvalidIdentifier(reason) => write!(f, "invalid identifier: {reason}"),
        }
    }
}

/// Validation failure carrying one entry per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: BTreeMap<&'static str, FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`. The first failure per field wins.
    pub fn push(&mut self, field: &'static str, error: FieldError) {
        self.errors.entry(field).or_insert(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Per-field failures keyed by serialized field name.
    pub fn errors(&self) -> &BTreeMap<&'static str, FieldError> {
        &self.errors
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }

    /// Returns `Ok(value)` when no field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        let mut separator = ": ";
        for (field, error) in &self.errors {
            write!(f, "{separator}{field} {error}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Checks a required text field that is already typed as a string.
pub(crate) fn check_text(errors: &mut ValidationError, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, FieldError::Blank);
    }
}

/// Extracts a required string field from an untyped document.
///
/// Returns `None` (and records the failure) when the field is absent,
/// `null`, not a string, or blank.
pub(crate) fn take_text(
    errors: &mut ValidationError,
    document: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Option<String> {
    match document.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, FieldError::Missing);
            None
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            errors.push(field, FieldError::Blank);
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            errors.push(
                field,
                FieldError::WrongType {
                    expected: "string",
                    found: json_type_name(other),
                },
            );
            None
        }
    }
}

/// Extracts a required identifier field from an untyped document.
pub(crate) fn take_id(
    errors: &mut ValidationError,
    document: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Option<RecordId> {
    let raw = take_text(errors, document, field)?;
    match RecordId::parse(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            errors.push(field, identifier_error(&err));
            None
        }
    }
}

pub(crate) fn identifier_error(err: &RecordIdError) -> FieldError {
    match err {
        RecordIdError::Blank => FieldError::Blank,
        other => FieldError::InvalidIdentifier(other.to_string()),
    }
}

/// Views a candidate as a JSON object, or reports the whole document.
pub(crate) fn as_object(
    candidate: &Value,
) -> Result<&serde_json::Map<String, Value>, ValidationError> {
    match candidate {
        Value::Object(map) => Ok(map),
        other => {
            let mut errors = ValidationError::new();
            errors.push(
                DOCUMENT_FIELD,
                FieldError::WrongType {
                    expected: "object",
                    found: json_type_name(other),
                },
            );
            Err(errors)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

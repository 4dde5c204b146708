//! Opaque record identifiers.
//!
//! # Responsibility
//! - Provide one identifier type shared by departments and employees.
//! - Generate fresh identifiers for records created without one.
//!
//! # Invariants
//! - A `RecordId` is never blank and never carries surrounding whitespace.
//! - Identifiers are compared byte-for-byte; no case folding.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned or caller-provided identifier of one record.
///
/// Generated values are UUID v4 in simple form (32 lowercase hex chars), but
/// any non-blank trimmed string is accepted so that identifiers minted by
/// other document stores can be imported unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Rejection reasons for caller-provided identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdError {
    Blank,
    SurroundingWhitespace(String),
}

impl Display for RecordIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "identifier cannot be blank"),
            Self::SurroundingWhitespace(value) => {
                write!(f, "identifier `{value}` has surrounding whitespace")
            }
        }
    }
}

impl Error for RecordIdError {}

impl RecordId {
    /// Mints a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parses a caller-provided identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, RecordIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RecordIdError::Blank);
        }
        if value.trim().len() != value.len() {
            return Err(RecordIdError::SurroundingWhitespace(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

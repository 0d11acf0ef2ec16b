//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A validated subject identifier.
///
/// Subjects are the people (or anything else) whose attendance is tracked.
/// Each subject gets its own timeline. IDs must be non-empty; uniqueness is
/// the storage layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty {
                field: "subject ID",
            });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SubjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_rejects_empty() {
        assert_eq!(
            SubjectId::new(""),
            Err(ValidationError::Empty {
                field: "subject ID"
            })
        );
        assert!(SubjectId::new("1042").is_ok());
    }

    #[test]
    fn subject_id_serde_roundtrip() {
        let id = SubjectId::new("1042").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1042\"");
        let parsed: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn subject_id_serde_rejects_empty() {
        let result: Result<SubjectId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn subject_id_orders_lexically() {
        let a: SubjectId = "alice".parse().unwrap();
        let b: SubjectId = "bob".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "alice");
    }
}

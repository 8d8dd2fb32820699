//! Repository Module
//!
//! Squirrel records on top of the line-oriented record store.
//!
//! ## Responsibilities
//! - Translate stored lines to typed records and back
//! - Validate required fields on create and replace
//! - Assign ids from a persisted, never-reused counter
//! - Serialize load-modify-save cycles behind one lock
//!
//! ## Line Encoding
//! ```text
//! {"type":"meta","next_id":4}
//! {"type":"squirrel","id":1,"name":"Sam","size":"large"}
//! {"type":"squirrel","id":3,"name":"Fluffy","size":"small"}
//! ```

mod line;
mod squirrels;

pub use line::StoredLine;
pub use squirrels::SquirrelRepository;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SquirrelError};

/// A stored squirrel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquirrelRecord {
    pub id: u64,
    pub name: String,
    pub size: String,
}

/// Client-supplied fields for create and replace
///
/// Both fields are optional here so that a missing field can be reported
/// as a validation error rather than a parse failure. Deserialized from the
/// urlencoded request body; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SquirrelFields {
    pub name: Option<String>,
    pub size: Option<String>,
}

impl SquirrelFields {
    /// Fields with both values present
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            size: Some(size.into()),
        }
    }

    /// Check both fields are present and non-empty, returning `(name, size)`
    pub fn validate(self) -> Result<(String, String)> {
        let name = Self::required("name", self.name)?;
        let size = Self::required("size", self.size)?;
        Ok((name, size))
    }

    fn required(field: &str, value: Option<String>) -> Result<String> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            Some(_) => Err(SquirrelError::Validation(format!(
                "field '{}' must not be empty",
                field
            ))),
            None => Err(SquirrelError::Validation(format!(
                "missing required field '{}'",
                field
            ))),
        }
    }
}

//! Stored line definitions
//!
//! One JSON object per line, tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use super::SquirrelRecord;

/// A single decoded line of the backing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoredLine {
    /// Id counter state
    Meta { next_id: u64 },

    /// A squirrel record
    Squirrel(SquirrelRecord),
}

impl StoredLine {
    /// Encode to a single line of JSON
    ///
    /// serde_json escapes control characters, so the result never contains
    /// a raw line break.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a line written by [`StoredLine::encode`]
    pub fn decode(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

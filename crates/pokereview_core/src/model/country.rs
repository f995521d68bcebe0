//! Country record.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Region an owner belongs to. One country has many owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: RecordId,
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_ID, name)
    }

    pub fn with_id(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("country", "name", &self.name)
    }
}

//! Reviewer record.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Author of reviews. Cannot be deleted while any review references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: RecordId,
    /// Natural key.
    pub first_name: String,
    pub last_name: String,
}

impl Reviewer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("reviewer", "first_name", &self.first_name)
    }
}

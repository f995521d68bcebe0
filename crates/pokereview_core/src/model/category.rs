//! Category record.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Pokemon grouping such as "Water" or "Electric".
///
/// Linked to Pokemon through `pokemon_categories` join rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    /// Natural key; unique under [`super::normalize_key`].
    pub name: String,
}

impl Category {
    /// Creates an unsaved category.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_ID, name)
    }

    /// Creates a category with a caller-provided id.
    pub fn with_id(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("category", "name", &self.name)
    }
}

//! Owner record.
//!
//! # Invariants
//! - `country_id` must reference a stored country on create and update.
//! - `first_name` is the natural key.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Trainer who owns Pokemon and belongs to exactly one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    /// Home gym; empty when unknown.
    #[serde(default)]
    pub gym: String,
    /// Foreign key into `countries`.
    pub country_id: RecordId,
}

impl Owner {
    /// Creates an unsaved owner attached to `country_id`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        country_id: RecordId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gym: String::new(),
            country_id,
        }
    }

    /// Sets the home gym.
    pub fn at_gym(mut self, gym: impl Into<String>) -> Self {
        self.gym = gym.into();
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("owner", "first_name", &self.first_name)
    }
}

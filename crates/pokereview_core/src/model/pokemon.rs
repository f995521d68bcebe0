//! Pokemon record.
//!
//! # Invariants
//! - `name` is the natural key.
//! - Owner and category links live in join tables, reviews in `reviews`;
//!   none of them are embedded here.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalogued creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: RecordId,
    pub name: String,
    /// Calendar date, persisted as `YYYY-MM-DD`.
    pub birth_date: NaiveDate,
}

impl Pokemon {
    /// Creates an unsaved pokemon.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            birth_date,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("pokemon", "name", &self.name)
    }
}

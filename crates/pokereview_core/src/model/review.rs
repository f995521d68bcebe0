//! Review record.
//!
//! # Invariants
//! - `pokemon_id` and `reviewer_id` reference stored records at creation time.
//! - Both references are fixed after creation; updates only replace
//!   title, text and rating.
//! - `title` is the natural key.

use super::{require_text, ModelValidationError, RecordId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// Rated opinion of one reviewer about one pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: RecordId,
    pub title: String,
    pub text: String,
    pub rating: i64,
    pub pokemon_id: RecordId,
    pub reviewer_id: RecordId,
}

impl Review {
    /// Creates an unsaved review of `pokemon_id` written by `reviewer_id`.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        rating: i64,
        pokemon_id: RecordId,
        reviewer_id: RecordId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            text: text.into(),
            rating,
            pokemon_id,
            reviewer_id,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("review", "title", &self.title)
    }
}

//! Catalog domain model.
//!
//! # Responsibility
//! - Define the six catalog records and their foreign-key shape.
//! - Own natural-key normalization used by every uniqueness check.
//!
//! # Invariants
//! - Records reference each other by id only; related records are resolved
//!   through repositories, never embedded.
//! - `UNASSIGNED_ID` marks a record the store has not persisted yet.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod country;
pub mod owner;
pub mod pokemon;
pub mod review;
pub mod reviewer;

/// Store-assigned integer identity shared by all catalog records.
pub type RecordId = i64;

/// Id carried by records that have not been created yet.
///
/// SQLite `AUTOINCREMENT` starts at 1, so `0` is never a stored id.
pub const UNASSIGNED_ID: RecordId = 0;

/// Record-level validation failure, raised before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty after trimming.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity} {field} must not be blank")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Normalizes a natural key for uniqueness comparison.
///
/// Keys compare case-insensitively with trailing whitespace ignored, so
/// `"Water"` and `"water "` collide while `" Water"` is a distinct key.
pub fn normalize_key(value: &str) -> String {
    value.trim_end().to_lowercase()
}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField { entity, field });
    }
    Ok(())
}

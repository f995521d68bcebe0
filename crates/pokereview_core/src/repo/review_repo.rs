//! Review persistence and foreign-key resolution.
//!
//! # Invariants
//! - Create requires the referenced pokemon and reviewer to exist.
//! - `pokemon_id` / `reviewer_id` are never rewritten by `update`.

use crate::model::pokemon::Pokemon;
use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::record_repo::{
    select_record, select_records, ForeignKey, Record, RepoResult, Repository, SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

/// SQLite-backed review repository.
pub type SqliteReviewRepository<'conn> = SqliteRepository<'conn, Review>;

impl Record for Review {
    const ENTITY: &'static str = "review";
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] =
        &["title", "text", "rating", "pokemon_id", "reviewer_id"];
    const IMMUTABLE_COLUMNS: &'static [&'static str] = &["pokemon_id", "reviewer_id"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn natural_key(&self) -> &str {
        &self.title
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        Review::validate(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.text.clone()),
            Value::Integer(self.rating),
            Value::Integer(self.pokemon_id),
            Value::Integer(self.reviewer_id),
        ]
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey {
                column: "pokemon_id",
                entity: "pokemon",
                table: "pokemon",
                id: self.pokemon_id,
            },
            ForeignKey {
                column: "reviewer_id",
                entity: "reviewer",
                table: "reviewers",
                id: self.reviewer_id,
            },
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            text: row.get("text")?,
            rating: row.get("rating")?,
            pokemon_id: row.get("pokemon_id")?,
            reviewer_id: row.get("reviewer_id")?,
        })
    }
}

/// Review repository with per-pokemon listing and reference resolution.
pub trait ReviewRepository: Repository<Review> {
    fn reviews_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Review>>;
    /// Resolves `review.pokemon_id`. `None` when the review is absent.
    fn pokemon_of_review(&self, review_id: RecordId) -> RepoResult<Option<Pokemon>>;
    /// Resolves `review.reviewer_id`. `None` when the review is absent.
    fn reviewer_of_review(&self, review_id: RecordId) -> RepoResult<Option<Reviewer>>;
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn reviews_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Review>> {
        select_records(
            self.conn(),
            "WHERE r.pokemon_id = ?1 ORDER BY r.id ASC",
            [pokemon_id],
        )
    }

    fn pokemon_of_review(&self, review_id: RecordId) -> RepoResult<Option<Pokemon>> {
        select_record(
            self.conn(),
            "INNER JOIN reviews rv ON rv.pokemon_id = r.id WHERE rv.id = ?1",
            [review_id],
        )
    }

    fn reviewer_of_review(&self, review_id: RecordId) -> RepoResult<Option<Reviewer>> {
        select_record(
            self.conn(),
            "INNER JOIN reviews rv ON rv.reviewer_id = r.id WHERE rv.id = ?1",
            [review_id],
        )
    }
}

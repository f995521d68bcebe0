//! Reviewer persistence and authored-review queries.

use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::record_repo::{select_records, Record, RepoResult, Repository, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

/// SQLite-backed reviewer repository.
pub type SqliteReviewerRepository<'conn> = SqliteRepository<'conn, Reviewer>;

impl Record for Reviewer {
    const ENTITY: &'static str = "reviewer";
    const TABLE: &'static str = "reviewers";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn natural_key(&self) -> &str {
        &self.first_name
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        Reviewer::validate(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.first_name.clone()),
            Value::Text(self.last_name.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
        })
    }
}

pub trait ReviewerRepository: Repository<Reviewer> {
    fn reviews_by_reviewer(&self, reviewer_id: RecordId) -> RepoResult<Vec<Review>>;
    fn review_count(&self, reviewer_id: RecordId) -> RepoResult<u64>;
}

impl ReviewerRepository for SqliteReviewerRepository<'_> {
    fn reviews_by_reviewer(&self, reviewer_id: RecordId) -> RepoResult<Vec<Review>> {
        select_records(
            self.conn(),
            "WHERE r.reviewer_id = ?1 ORDER BY r.id ASC",
            [reviewer_id],
        )
    }

    fn review_count(&self, reviewer_id: RecordId) -> RepoResult<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM reviews WHERE reviewer_id = ?1;",
            [reviewer_id],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

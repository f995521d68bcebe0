//! Country persistence and country-side relationship queries.

use crate::model::country::Country;
use crate::model::owner::Owner;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::record_repo::{
    select_record, select_records, Record, RepoResult, Repository, SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

/// SQLite-backed country repository.
pub type SqliteCountryRepository<'conn> = SqliteRepository<'conn, Country>;

impl Record for Country {
    const ENTITY: &'static str = "country";
    const TABLE: &'static str = "countries";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        Country::validate(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![Value::Text(self.name.clone())]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Country repository with owner membership queries.
pub trait CountryRepository: Repository<Country> {
    fn owners_from_country(&self, country_id: RecordId) -> RepoResult<Vec<Owner>>;
    /// Resolves an owner's country reference. `None` when the owner is absent.
    fn country_by_owner(&self, owner_id: RecordId) -> RepoResult<Option<Country>>;
    /// Number of owners still pointing at the country.
    fn owner_count(&self, country_id: RecordId) -> RepoResult<u64>;
}

impl CountryRepository for SqliteCountryRepository<'_> {
    fn owners_from_country(&self, country_id: RecordId) -> RepoResult<Vec<Owner>> {
        select_records(
            self.conn(),
            "WHERE r.country_id = ?1 ORDER BY r.id ASC",
            [country_id],
        )
    }

    fn country_by_owner(&self, owner_id: RecordId) -> RepoResult<Option<Country>> {
        country_of_owner(self.conn(), owner_id)
    }

    fn owner_count(&self, country_id: RecordId) -> RepoResult<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM owners WHERE country_id = ?1;",
            [country_id],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

pub(crate) fn country_of_owner(
    conn: &Connection,
    owner_id: RecordId,
) -> RepoResult<Option<Country>> {
    select_record(
        conn,
        "INNER JOIN owners o ON o.country_id = r.id WHERE o.id = ?1",
        [owner_id],
    )
}

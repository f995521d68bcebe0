//! Owner persistence and owner-side relationship queries.

use crate::model::country::Country;
use crate::model::owner::Owner;
use crate::model::pokemon::Pokemon;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::country_repo::country_of_owner;
use crate::repo::links::{link_pokemon, PokemonLink};
use crate::repo::record_repo::{
    select_records, ForeignKey, Record, RepoResult, Repository, SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

/// SQLite-backed owner repository.
pub type SqliteOwnerRepository<'conn> = SqliteRepository<'conn, Owner>;

impl Record for Owner {
    const ENTITY: &'static str = "owner";
    const TABLE: &'static str = "owners";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name", "gym", "country_id"];

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
        Owner::validate(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.first_name.clone()),
            Value::Text(self.last_name.clone()),
            Value::Text(self.gym.clone()),
            Value::Integer(self.country_id),
        ]
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey {
            column: "country_id",
            entity: "country",
            table: "countries",
            id: self.country_id,
        }]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            gym: row.get("gym")?,
            country_id: row.get("country_id")?,
        })
    }
}

/// Owner repository with pokemon and country traversal.
pub trait OwnerRepository: Repository<Owner> {
    /// Pokemon the owner holds through `pokemon_owners`.
    fn pokemon_by_owner(&self, owner_id: RecordId) -> RepoResult<Vec<Pokemon>>;
    /// Resolves the owner's country reference.
    fn country_by_owner(&self, owner_id: RecordId) -> RepoResult<Option<Country>>;
    /// Gives a pokemon to the owner. Linking twice is a no-op.
    fn link_pokemon(&self, owner_id: RecordId, pokemon_id: RecordId) -> RepoResult<()>;
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn pokemon_by_owner(&self, owner_id: RecordId) -> RepoResult<Vec<Pokemon>> {
        select_records(
            self.conn(),
            "INNER JOIN pokemon_owners po ON po.pokemon_id = r.id
             WHERE po.owner_id = ?1
             ORDER BY r.id ASC",
            [owner_id],
        )
    }

    fn country_by_owner(&self, owner_id: RecordId) -> RepoResult<Option<Country>> {
        country_of_owner(self.conn(), owner_id)
    }

    fn link_pokemon(&self, owner_id: RecordId, pokemon_id: RecordId) -> RepoResult<()> {
        link_pokemon(self.conn(), PokemonLink::Owner, pokemon_id, owner_id)?;
        Ok(())
    }
}

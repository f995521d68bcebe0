//! Pokemon persistence, rating aggregation and linked creation.
//!
//! # Responsibility
//! - Map `Pokemon` to the `pokemon` table.
//! - Create a pokemon together with its owner and category links atomically.
//! - Aggregate review ratings.
//!
//! # Invariants
//! - `create_with_links` either persists the pokemon and both join rows or
//!   nothing at all.
//! - `rating` of an unreviewed pokemon is [`NEUTRAL_RATING`].

use crate::model::category::Category;
use crate::model::owner::Owner;
use crate::model::pokemon::Pokemon;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::links::{link_pokemon, PokemonLink};
use crate::repo::record_repo::{
    row_exists, select_records, Record, RepoError, RepoResult, Repository, SqliteRepository,
};
use chrono::NaiveDate;
use log::info;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};

/// Persisted `birth_date` format.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rating reported for a pokemon without reviews.
pub const NEUTRAL_RATING: f64 = 0.0;

/// SQLite-backed pokemon repository.
pub type SqlitePokemonRepository<'conn> = SqliteRepository<'conn, Pokemon>;

impl Record for Pokemon {
    const ENTITY: &'static str = "pokemon";
    const TABLE: &'static str = "pokemon";
    const COLUMNS: &'static [&'static str] = &["name", "birth_date"];

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
        Pokemon::validate(self)
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.birth_date.format(BIRTH_DATE_FORMAT).to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let birth_date_text: String = row.get("birth_date")?;
        let birth_date = NaiveDate::parse_from_str(&birth_date_text, BIRTH_DATE_FORMAT)
            .map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid birth date `{birth_date_text}` in pokemon.birth_date"
                ))
            })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            birth_date,
        })
    }
}

/// Pokemon repository with rating and link-aware creation.
pub trait PokemonRepository: Repository<Pokemon> {
    /// Mean rating over the pokemon's reviews, or [`NEUTRAL_RATING`].
    fn rating(&self, pokemon_id: RecordId) -> RepoResult<f64>;
    /// Persists `pokemon` and links it to `owner_id` and `category_id` in one
    /// transaction.
    ///
    /// # Errors
    /// - `NotFound` for a missing owner or category; nothing is written.
    /// - `Duplicate` when the pokemon name is taken.
    fn create_with_links(
        &self,
        owner_id: RecordId,
        category_id: RecordId,
        pokemon: &Pokemon,
    ) -> RepoResult<Pokemon>;
    fn categories_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Category>>;
    fn owners_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Owner>>;
}

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn rating(&self, pokemon_id: RecordId) -> RepoResult<f64> {
        let average: Option<f64> = self.conn().query_row(
            "SELECT AVG(rating) FROM reviews WHERE pokemon_id = ?1;",
            [pokemon_id],
            |row| row.get(0),
        )?;
        Ok(average.unwrap_or(NEUTRAL_RATING))
    }

    fn create_with_links(
        &self,
        owner_id: RecordId,
        category_id: RecordId,
        pokemon: &Pokemon,
    ) -> RepoResult<Pokemon> {
        let tx = Transaction::new_unchecked(self.conn(), TransactionBehavior::Immediate)?;
        let stored = create_linked_pokemon(&tx, owner_id, category_id, pokemon)?;
        tx.commit()?;

        info!(
            "event=pokemon_create module=repo status=ok id={} owner_id={owner_id} category_id={category_id}",
            stored.id
        );
        Ok(stored)
    }

    fn categories_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Category>> {
        select_records(
            self.conn(),
            "INNER JOIN pokemon_categories pc ON pc.category_id = r.id
             WHERE pc.pokemon_id = ?1
             ORDER BY r.id ASC",
            [pokemon_id],
        )
    }

    fn owners_of_pokemon(&self, pokemon_id: RecordId) -> RepoResult<Vec<Owner>> {
        select_records(
            self.conn(),
            "INNER JOIN pokemon_owners po ON po.owner_id = r.id
             WHERE po.pokemon_id = ?1
             ORDER BY r.id ASC",
            [pokemon_id],
        )
    }
}

/// Creation steps of [`PokemonRepository::create_with_links`], run on a
/// connection that is already inside a transaction.
pub(crate) fn create_linked_pokemon(
    conn: &Connection,
    owner_id: RecordId,
    category_id: RecordId,
    pokemon: &Pokemon,
) -> RepoResult<Pokemon> {
    if !row_exists(conn, Owner::TABLE, owner_id)? {
        return Err(RepoError::NotFound {
            entity: Owner::ENTITY,
            id: owner_id,
        });
    }
    if !row_exists(conn, Category::TABLE, category_id)? {
        return Err(RepoError::NotFound {
            entity: Category::ENTITY,
            id: category_id,
        });
    }

    let stored = SqlitePokemonRepository::attach(conn).create(pokemon)?;
    link_pokemon(conn, PokemonLink::Owner, stored.id, owner_id)?;
    link_pokemon(conn, PokemonLink::Category, stored.id, category_id)?;
    Ok(stored)
}

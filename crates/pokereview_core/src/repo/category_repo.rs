//! Category persistence and category-side relationship queries.

use crate::model::category::Category;
use crate::model::pokemon::Pokemon;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::links::{link_pokemon, PokemonLink};
use crate::repo::record_repo::{select_records, Record, RepoResult, Repository, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

/// SQLite-backed category repository.
pub type SqliteCategoryRepository<'conn> = SqliteRepository<'conn, Category>;

impl Record for Category {
    const ENTITY: &'static str = "category";
    const TABLE: &'static str = "categories";
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
        Category::validate(self)
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

/// Category repository with pokemon membership queries.
pub trait CategoryRepository: Repository<Category> {
    /// Pokemon linked to the category, in pokemon insertion order.
    fn pokemon_by_category(&self, category_id: RecordId) -> RepoResult<Vec<Pokemon>>;
    /// Adds a pokemon to the category. Linking twice is a no-op.
    fn link_pokemon(&self, category_id: RecordId, pokemon_id: RecordId) -> RepoResult<()>;
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn pokemon_by_category(&self, category_id: RecordId) -> RepoResult<Vec<Pokemon>> {
        select_records(
            self.conn(),
            "INNER JOIN pokemon_categories pc ON pc.pokemon_id = r.id
             WHERE pc.category_id = ?1
             ORDER BY r.id ASC",
            [category_id],
        )
    }

    fn link_pokemon(&self, category_id: RecordId, pokemon_id: RecordId) -> RepoResult<()> {
        link_pokemon(self.conn(), PokemonLink::Category, pokemon_id, category_id)?;
        Ok(())
    }
}

//! Pokemon join-table writes shared by the owner and category repositories.
//!
//! # Invariants
//! - Linking is idempotent: an existing pair is left untouched.
//! - Both endpoints must exist; join rows never dangle.
//! - Join rows are removed by `ON DELETE CASCADE` when either endpoint goes.

use crate::model::RecordId;
use crate::repo::record_repo::{row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PokemonLink {
    Category,
    Owner,
}

impl PokemonLink {
    fn table(self) -> &'static str {
        match self {
            Self::Category => "pokemon_categories",
            Self::Owner => "pokemon_owners",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Category => "category_id",
            Self::Owner => "owner_id",
        }
    }

    fn endpoint(self) -> (&'static str, &'static str) {
        match self {
            Self::Category => ("category", "categories"),
            Self::Owner => ("owner", "owners"),
        }
    }
}

/// Inserts one join row. Returns `false` when the pair already existed.
pub(crate) fn link_pokemon(
    conn: &Connection,
    link: PokemonLink,
    pokemon_id: RecordId,
    other_id: RecordId,
) -> RepoResult<bool> {
    if !row_exists(conn, "pokemon", pokemon_id)? {
        return Err(RepoError::NotFound {
            entity: "pokemon",
            id: pokemon_id,
        });
    }
    let (entity, table) = link.endpoint();
    if !row_exists(conn, table, other_id)? {
        return Err(RepoError::NotFound {
            entity,
            id: other_id,
        });
    }

    let inserted = conn.execute(
        &format!(
            "INSERT OR IGNORE INTO {} (pokemon_id, {}) VALUES (?1, ?2);",
            link.table(),
            link.column()
        ),
        params![pokemon_id, other_id],
    )?;
    Ok(inserted == 1)
}

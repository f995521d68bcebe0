//! Cross-entity delete orchestration.
//!
//! # Responsibility
//! - Delete a pokemon together with every review that references it.
//! - Refuse to delete reviewers and countries that still have dependents.
//!
//! # Invariants
//! - Each delete runs in one `IMMEDIATE` transaction; any failure rolls back
//!   every step, so a pokemon is never removed while its reviews remain.
//! - A refused delete leaves the store untouched.

use crate::model::country::Country;
use crate::model::pokemon::Pokemon;
use crate::model::reviewer::Reviewer;
use crate::model::RecordId;
use crate::repo::country_repo::{CountryRepository, SqliteCountryRepository};
use crate::repo::pokemon_repo::SqlitePokemonRepository;
use crate::repo::record_repo::{Record, RepoError, RepoResult, Repository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Outcome of a cascading pokemon delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonRemoval {
    /// The deleted pokemon as it was stored.
    pub pokemon: Pokemon,
    /// Reviews removed ahead of the pokemon.
    pub reviews_removed: usize,
}

/// Runs multi-step deletes against the shared connection.
pub struct CascadeCoordinator<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CascadeCoordinator<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Deletes a pokemon after bulk-deleting its reviews.
    ///
    /// # Errors
    /// - `NotFound` when the pokemon does not exist.
    /// - Any failure while removing reviews aborts before the pokemon is
    ///   touched.
    pub fn delete_pokemon(&self, pokemon_id: RecordId) -> RepoResult<PokemonRemoval> {
        let outcome = self.in_transaction(|tx| {
            let pokemon_repo = SqlitePokemonRepository::attach(tx);
            let pokemon = pokemon_repo.get(pokemon_id)?.ok_or(RepoError::NotFound {
                entity: Pokemon::ENTITY,
                id: pokemon_id,
            })?;

            let review_repo = SqliteReviewRepository::attach(tx);
            let reviews = review_repo.reviews_of_pokemon(pokemon_id)?;
            let reviews_removed = review_repo.delete_many(&reviews)?;
            pokemon_repo.delete(&pokemon)?;

            Ok(PokemonRemoval {
                pokemon,
                reviews_removed,
            })
        });
        log_outcome("pokemon_delete", Pokemon::ENTITY, pokemon_id, &outcome);
        if let Ok(removal) = &outcome {
            debug!(
                "event=pokemon_delete module=cascade id={pokemon_id} reviews_removed={}",
                removal.reviews_removed
            );
        }
        outcome
    }

    /// Deletes a reviewer that has authored no reviews.
    ///
    /// # Errors
    /// - `NotFound` when the reviewer does not exist.
    /// - `Conflict` while any review references the reviewer.
    pub fn delete_reviewer(&self, reviewer_id: RecordId) -> RepoResult<Reviewer> {
        let outcome = self.in_transaction(|tx| {
            let repo = SqliteReviewerRepository::attach(tx);
            let reviewer = repo.get(reviewer_id)?.ok_or(RepoError::NotFound {
                entity: Reviewer::ENTITY,
                id: reviewer_id,
            })?;

            let reviews = repo.review_count(reviewer_id)?;
            if reviews > 0 {
                return Err(RepoError::Conflict {
                    entity: Reviewer::ENTITY,
                    id: reviewer_id,
                    reason: format!("{reviews} review(s) still reference it"),
                });
            }

            repo.delete(&reviewer)?;
            Ok(reviewer)
        });
        log_outcome("reviewer_delete", Reviewer::ENTITY, reviewer_id, &outcome);
        outcome
    }

    /// Deletes a country that no owner belongs to.
    ///
    /// # Errors
    /// - `NotFound` when the country does not exist.
    /// - `Conflict` while any owner references the country.
    pub fn delete_country(&self, country_id: RecordId) -> RepoResult<Country> {
        let outcome = self.in_transaction(|tx| {
            let repo = SqliteCountryRepository::attach(tx);
            let country = repo.get(country_id)?.ok_or(RepoError::NotFound {
                entity: Country::ENTITY,
                id: country_id,
            })?;

            let owners = repo.owner_count(country_id)?;
            if owners > 0 {
                return Err(RepoError::Conflict {
                    entity: Country::ENTITY,
                    id: country_id,
                    reason: format!("{owners} owner(s) still belong to it"),
                });
            }

            repo.delete(&country)?;
            Ok(country)
        });
        log_outcome("country_delete", Country::ENTITY, country_id, &outcome);
        outcome
    }

    fn in_transaction<T>(
        &self,
        steps: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = steps(&*tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn log_outcome<T>(event: &str, entity: &str, id: RecordId, outcome: &RepoResult<T>) {
    match outcome {
        Ok(_) => info!("event={event} module=cascade status=ok entity={entity} id={id}"),
        Err(RepoError::Conflict { .. }) => {
            warn!("event={event} module=cascade status=refused entity={entity} id={id}")
        }
        Err(err) => {
            warn!("event={event} module=cascade status=error entity={entity} id={id} error={err}")
        }
    }
}

//! Request-level catalog use cases.
//!
//! # Responsibility
//! - Give the routing layer one entry point per catalog endpoint.
//! - Check path/body id agreement and anchor-record existence before
//!   delegating to repositories.
//! - Classify every failure so callers can pick a response status without
//!   re-querying the store.
//!
//! # Invariants
//! - Relationship queries on a missing anchor record fail with `NotFound`
//!   instead of returning an empty collection.
//! - Pokemon, reviewer and country deletes always go through
//!   [`CascadeCoordinator`].

use crate::model::category::Category;
use crate::model::country::Country;
use crate::model::owner::Owner;
use crate::model::pokemon::Pokemon;
use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use crate::model::{ModelValidationError, RecordId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::country_repo::{CountryRepository, SqliteCountryRepository};
use crate::repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
use crate::repo::pokemon_repo::{PokemonRepository, SqlitePokemonRepository};
use crate::repo::record_repo::{Record, RepoError, Repository, SqliteRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
use crate::service::cascade::{CascadeCoordinator, PokemonRemoval};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogServiceError>;

/// Failure class surfaced to the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request: blank key or path/body id mismatch.
    Validation,
    NotFound,
    /// Natural key already taken.
    Duplicate,
    /// Delete blocked by dependent records.
    Conflict,
    /// Store rejected or failed the operation.
    Persistence,
}

impl ErrorKind {
    /// HTTP status the routing layer responds with.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Duplicate | Self::Conflict => 422,
            Self::Persistence => 500,
        }
    }
}

/// Service error for catalog use cases.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// Id in the request path differs from the id in the body.
    IdMismatch {
        path_id: RecordId,
        body_id: RecordId,
    },
    Invalid(ModelValidationError),
    NotFound {
        entity: &'static str,
        id: RecordId,
    },
    Duplicate {
        entity: &'static str,
        key: String,
    },
    Conflict {
        entity: &'static str,
        id: RecordId,
        reason: String,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl CatalogServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IdMismatch { .. } | Self::Invalid(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Repo(_) => ErrorKind::Persistence,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdMismatch { path_id, body_id } => {
                write!(f, "path id {path_id} does not match body id {body_id}")
            }
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Duplicate { entity, key } => write!(f, "{entity} already exists: `{key}`"),
            Self::Conflict { entity, id, reason } => {
                write!(f, "{entity} {id} cannot be deleted: {reason}")
            }
            Self::Repo(err) => write!(f, "catalog store failure: {err}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Duplicate { entity, key } => Self::Duplicate { entity, key },
            RepoError::Conflict { entity, id, reason } => Self::Conflict { entity, id, reason },
            other => Self::Repo(other),
        }
    }
}

/// Records that can be created without linking to other records.
pub trait Standalone: Record {}

impl Standalone for Category {}
impl Standalone for Country {}
impl Standalone for Reviewer {}

/// Catalog facade over the shared connection.
pub struct CatalogService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CatalogService<'conn> {
    /// Creates a service over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> CatalogResult<Self> {
        SqliteCategoryRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// `GET /<entity>`
    pub fn list<E: Record>(&self) -> CatalogResult<Vec<E>> {
        Ok(self.repo::<E>().list()?)
    }

    /// `GET /<entity>/{id}`
    pub fn get<E: Record>(&self, id: RecordId) -> CatalogResult<E> {
        self.repo::<E>()
            .get(id)?
            .ok_or(CatalogServiceError::NotFound {
                entity: E::ENTITY,
                id,
            })
    }

    /// `POST /<entity>` for categories, countries and reviewers.
    pub fn create<E: Standalone>(&self, record: &E) -> CatalogResult<E> {
        Ok(self.repo::<E>().create(record)?)
    }

    /// `PUT /<entity>/{id}`
    pub fn update<E: Record>(&self, path_id: RecordId, record: &E) -> CatalogResult<E> {
        if path_id != record.id() {
            return Err(CatalogServiceError::IdMismatch {
                path_id,
                body_id: record.id(),
            });
        }
        Ok(self.repo::<E>().update(record)?)
    }

    /// `POST /owner?countryId=`
    pub fn create_owner(&self, country_id: RecordId, owner: &Owner) -> CatalogResult<Owner> {
        let owner = Owner {
            country_id,
            ..owner.clone()
        };
        Ok(SqliteOwnerRepository::attach(self.conn).create(&owner)?)
    }

    /// `POST /pokemon?ownerId=&categoryId=`
    pub fn create_pokemon(
        &self,
        owner_id: RecordId,
        category_id: RecordId,
        pokemon: &Pokemon,
    ) -> CatalogResult<Pokemon> {
        Ok(SqlitePokemonRepository::attach(self.conn).create_with_links(
            owner_id,
            category_id,
            pokemon,
        )?)
    }

    /// `POST /review?pokemonId=&reviewerId=`
    pub fn create_review(
        &self,
        pokemon_id: RecordId,
        reviewer_id: RecordId,
        review: &Review,
    ) -> CatalogResult<Review> {
        let review = Review {
            pokemon_id,
            reviewer_id,
            ..review.clone()
        };
        Ok(SqliteReviewRepository::attach(self.conn).create(&review)?)
    }

    pub fn delete_category(&self, id: RecordId) -> CatalogResult<Category> {
        self.delete_record(id)
    }

    /// Deletes an owner; its pokemon links go with it, the pokemon stay.
    pub fn delete_owner(&self, id: RecordId) -> CatalogResult<Owner> {
        self.delete_record(id)
    }

    pub fn delete_review(&self, id: RecordId) -> CatalogResult<Review> {
        self.delete_record(id)
    }

    /// Deletes a pokemon and all of its reviews.
    pub fn delete_pokemon(&self, id: RecordId) -> CatalogResult<PokemonRemoval> {
        Ok(self.cascade().delete_pokemon(id)?)
    }

    /// Deletes a reviewer; refused with `Conflict` while reviews exist.
    pub fn delete_reviewer(&self, id: RecordId) -> CatalogResult<Reviewer> {
        Ok(self.cascade().delete_reviewer(id)?)
    }

    /// Deletes a country; refused with `Conflict` while owners belong to it.
    pub fn delete_country(&self, id: RecordId) -> CatalogResult<Country> {
        Ok(self.cascade().delete_country(id)?)
    }

    /// `GET /category/pokemon/{categoryId}`
    pub fn pokemon_by_category(&self, category_id: RecordId) -> CatalogResult<Vec<Pokemon>> {
        self.require::<Category>(category_id)?;
        Ok(SqliteCategoryRepository::attach(self.conn).pokemon_by_category(category_id)?)
    }

    /// `GET /country/{countryId}/owners`
    pub fn owners_from_country(&self, country_id: RecordId) -> CatalogResult<Vec<Owner>> {
        self.require::<Country>(country_id)?;
        Ok(SqliteCountryRepository::attach(self.conn).owners_from_country(country_id)?)
    }

    /// `GET /country/owners/{ownerId}`
    pub fn country_by_owner(&self, owner_id: RecordId) -> CatalogResult<Country> {
        self.require::<Owner>(owner_id)?;
        SqliteOwnerRepository::attach(self.conn)
            .country_by_owner(owner_id)?
            .ok_or(CatalogServiceError::NotFound {
                entity: Owner::ENTITY,
                id: owner_id,
            })
    }

    /// `GET /owner/{ownerId}/pokemon`
    pub fn pokemon_by_owner(&self, owner_id: RecordId) -> CatalogResult<Vec<Pokemon>> {
        self.require::<Owner>(owner_id)?;
        Ok(SqliteOwnerRepository::attach(self.conn).pokemon_by_owner(owner_id)?)
    }

    /// `GET /pokemon/{pokeId}/rating`
    pub fn pokemon_rating(&self, pokemon_id: RecordId) -> CatalogResult<f64> {
        self.require::<Pokemon>(pokemon_id)?;
        Ok(SqlitePokemonRepository::attach(self.conn).rating(pokemon_id)?)
    }

    pub fn categories_of_pokemon(&self, pokemon_id: RecordId) -> CatalogResult<Vec<Category>> {
        self.require::<Pokemon>(pokemon_id)?;
        Ok(SqlitePokemonRepository::attach(self.conn).categories_of_pokemon(pokemon_id)?)
    }

    pub fn owners_of_pokemon(&self, pokemon_id: RecordId) -> CatalogResult<Vec<Owner>> {
        self.require::<Pokemon>(pokemon_id)?;
        Ok(SqlitePokemonRepository::attach(self.conn).owners_of_pokemon(pokemon_id)?)
    }

    /// `GET /review/pokemon/{pokeId}`
    pub fn reviews_of_pokemon(&self, pokemon_id: RecordId) -> CatalogResult<Vec<Review>> {
        self.require::<Pokemon>(pokemon_id)?;
        Ok(SqliteReviewRepository::attach(self.conn).reviews_of_pokemon(pokemon_id)?)
    }

    /// `GET /reviewer/{reviewerId}/reviews`
    pub fn reviews_by_reviewer(&self, reviewer_id: RecordId) -> CatalogResult<Vec<Review>> {
        self.require::<Reviewer>(reviewer_id)?;
        Ok(SqliteReviewerRepository::attach(self.conn).reviews_by_reviewer(reviewer_id)?)
    }

    /// `GET /review/{reviewId}/pokemon`
    pub fn pokemon_of_review(&self, review_id: RecordId) -> CatalogResult<Pokemon> {
        SqliteReviewRepository::attach(self.conn)
            .pokemon_of_review(review_id)?
            .ok_or(CatalogServiceError::NotFound {
                entity: Review::ENTITY,
                id: review_id,
            })
    }

    pub fn reviewer_of_review(&self, review_id: RecordId) -> CatalogResult<Reviewer> {
        SqliteReviewRepository::attach(self.conn)
            .reviewer_of_review(review_id)?
            .ok_or(CatalogServiceError::NotFound {
                entity: Review::ENTITY,
                id: review_id,
            })
    }

    fn repo<E: Record>(&self) -> SqliteRepository<'conn, E> {
        SqliteRepository::attach(self.conn)
    }

    fn cascade(&self) -> CascadeCoordinator<'conn> {
        CascadeCoordinator::new(self.conn)
    }

    fn require<E: Record>(&self, id: RecordId) -> CatalogResult<()> {
        if !self.repo::<E>().exists(id)? {
            return Err(CatalogServiceError::NotFound {
                entity: E::ENTITY,
                id,
            });
        }
        Ok(())
    }

    fn delete_record<E: Record>(&self, id: RecordId) -> CatalogResult<E> {
        let repo = self.repo::<E>();
        let record = repo.get(id)?.ok_or(CatalogServiceError::NotFound {
            entity: E::ENTITY,
            id,
        })?;
        repo.delete(&record)?;
        Ok(record)
    }
}

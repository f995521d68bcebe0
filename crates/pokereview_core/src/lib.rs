//! Core data access for the Pokemon review catalog.
//! This crate owns the schema, the record invariants and the cascade rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::Category;
pub use model::country::Country;
pub use model::owner::Owner;
pub use model::pokemon::Pokemon;
pub use model::review::Review;
pub use model::reviewer::Reviewer;
pub use model::{ModelValidationError, RecordId, UNASSIGNED_ID};
pub use repo::record_repo::{Record, RepoError, RepoResult, Repository, SqliteRepository};
pub use seed::{seed_sample_catalog, SeedSummary};
pub use service::cascade::{CascadeCoordinator, PokemonRemoval};
pub use service::catalog_service::{CatalogService, CatalogServiceError, ErrorKind};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

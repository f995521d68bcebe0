//! Repository layer: catalog data-access contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide the shared record contract ([`record_repo::Repository`]) once,
//!   generic over entity type.
//! - Add per-entity relationship traits on top of it.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Repositories borrow one caller-owned connection; they hold no state.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`,
//!   `Conflict`) in addition to DB transport errors.

pub mod category_repo;
pub mod country_repo;
mod links;
pub mod owner_repo;
pub mod pokemon_repo;
pub mod record_repo;
pub mod review_repo;
pub mod reviewer_repo;

//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into endpoint-level operations.
//! - Own the only multi-entity delete sequences.

pub mod cascade;
pub mod catalog_service;

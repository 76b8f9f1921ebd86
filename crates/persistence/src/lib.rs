#![deny(warnings)]

//! Persistence layer: SQLite schema, typed row structs and query functions.
//!
//! All mutations run through query functions that take an explicit
//! `&mut SqliteConnection`, so the same function works inside a transaction
//! (for the atomic day-advance/billing/purchase paths) and on a plain
//! pooled connection (for read-only views).

pub mod queries;
pub mod rows;
pub mod store;

pub use store::{default_sqlite_url, Store};

// The one sqlx type query-function callers need in their signatures.
pub use sqlx::SqliteConnection;

use sim_core::DomainError;
use thiserror::Error;

/// Failures surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Any sqlx-level failure; the surrounding transaction rolls back.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    /// A persisted value could not be mapped back into the domain.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<DomainError> for StoreError {
    fn from(e: DomainError) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

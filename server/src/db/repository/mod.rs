//! Repository Module
//!
//! Per-table data access over the embedded SurrealDB handle. Mutations that
//! participate in settlement are single conditional statements so the
//! storage layer, not application code, arbitrates races.

pub mod bill;
pub mod distributor;
pub mod order;
pub mod product;

// Re-exports
pub use bill::BillRepository;
pub use distributor::DistributorRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Locked: {0}")]
    Locked(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Commit conflicts mean a concurrent transaction touched the same
        // records; callers surface these as concurrent modification rather
        // than a storage failure.
        if msg.contains("conflict") {
            RepoError::Conflict(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may arrive as `table:key` or a bare key
///
/// Rejects ids whose table prefix does not match the expected table.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((prefix, key)) = id.split_once(':') {
        if prefix != table {
            return Err(RepoError::Validation(format!(
                "Invalid {table} id: {id}"
            )));
        }
        Ok(RecordId::from_table_key(table, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

//! Storage module: SQLite-backed full-text index and frontier persistence
//!
//! One database file holds the FTS5 document index that search queries run
//! against, plus the persisted frontier snapshot (seen set and pending queue)
//! that lets an interrupted crawl resume.

mod schema;
mod sqlite;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A document row in the full-text index
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// One ranked search hit with its highlighted snippet
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snip: String,
    pub rank: f64,
}

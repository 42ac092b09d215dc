//! Dredge: a crawling full-text search engine
//!
//! This crate implements a small search engine: a pool of crawl workers drains
//! a shared priority frontier, fetched pages are indexed into an FTS5 store,
//! and an HTTP surface serves ranked, paginated queries over the index.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod search;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Dredge operations
#[derive(Debug, Error)]
pub enum DredgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Dredge operations
pub type Result<T> = std::result::Result<T, DredgeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use frontier::{FrontierStore, MemoryFrontier, DEFAULT_SCORE, SCORE_FLOOR};
pub use url::Canonicalizer;

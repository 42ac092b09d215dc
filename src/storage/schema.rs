//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Dredge database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Full-text document index: one row per canonical URL
CREATE VIRTUAL TABLE IF NOT EXISTS pages USING fts5(
    url UNINDEXED,
    title,
    content,
    tokenize='porter'
);

-- Frontier snapshot: canonical URLs ever admitted
CREATE TABLE IF NOT EXISTS seen_urls (
    url TEXT PRIMARY KEY
);

-- Frontier snapshot: pending entries with their priority scores
CREATE TABLE IF NOT EXISTS frontier (
    url TEXT PRIMARY KEY,
    score REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_frontier_score ON frontier(score);

-- Crawl metadata (config hash, snapshot timestamp)
CREATE TABLE IF NOT EXISTS crawl_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

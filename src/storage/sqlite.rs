//! SQLite storage implementation
//!
//! Workers and the crawl manager each hold their own `SqliteStorage`
//! connection; WAL journaling plus a busy timeout keeps concurrent writers
//! from tripping over each other while searches read without blocking.

use crate::frontier::FrontierSnapshot;
use crate::storage::schema::initialize_schema;
use crate::storage::{DocumentRecord, SearchHit, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SEARCH_SQL: &str = "\
SELECT url, title,
       snippet(pages, 2, '<mark>', '</mark>', ' … ', 12) AS snip,
       bm25(pages) AS rank
FROM pages
WHERE pages MATCH ?1
ORDER BY rank
LIMIT ?2 OFFSET ?3";

const COUNT_SQL: &str = "SELECT count(*) FROM pages WHERE pages MATCH ?1";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Document Index =====

    /// Inserts or replaces the document row for `url`.
    ///
    /// Delete and insert run inside one transaction so a concurrent reader
    /// never observes the URL momentarily absent between the two statements.
    pub fn upsert_page(&mut self, url: &str, title: &str, content: &str) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM pages WHERE url = ?1", params![url])?;
        tx.execute(
            "INSERT INTO pages (url, title, content) VALUES (?1, ?2, ?3)",
            params![url, title, content],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Fetches a single document row by URL
    pub fn get_page(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, title, content FROM pages WHERE url = ?1",
                params![url],
                |row| {
                    Ok(DocumentRecord {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        content: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Total number of indexed documents
    pub fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Search =====

    /// Runs a ranked match query over the index.
    ///
    /// FTS5 rejects malformed match expressions with an error; callers decide
    /// how to degrade (the search engine maps it to an empty result set).
    pub fn search_pages(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(SEARCH_SQL)?;
        let hits = stmt
            .query_map(params![query, limit as i64, offset as i64], |row| {
                Ok(SearchHit {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    snip: row.get(2)?,
                    rank: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    /// Counts rows matching a query expression
    pub fn count_matches(&self, query: &str) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row(COUNT_SQL, params![query], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Frontier Persistence =====

    /// Replaces the persisted frontier snapshot in one transaction.
    ///
    /// Seen set and pending queue are written together; a torn snapshot with
    /// URLs seen but missing from the queue cannot be produced.
    pub fn save_frontier_snapshot(&mut self, snapshot: &FrontierSnapshot) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM seen_urls", [])?;
        tx.execute("DELETE FROM frontier", [])?;

        {
            let mut stmt = tx.prepare("INSERT INTO seen_urls (url) VALUES (?1)")?;
            for url in &snapshot.seen {
                stmt.execute(params![url])?;
            }

            let mut stmt = tx.prepare("INSERT INTO frontier (url, score) VALUES (?1, ?2)")?;
            for (url, score) in &snapshot.pending {
                stmt.execute(params![url, score])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO crawl_meta (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            stmt.execute(params![
                "snapshot-saved-at",
                chrono::Utc::now().to_rfc3339()
            ])?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Loads the persisted frontier snapshot (empty if none was saved)
    pub fn load_frontier_snapshot(&self) -> StorageResult<FrontierSnapshot> {
        let mut stmt = self.conn.prepare("SELECT url FROM seen_urls")?;
        let seen = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let mut stmt = self.conn.prepare("SELECT url, score FROM frontier")?;
        let pending = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, f64)>, _>>()?;

        Ok(FrontierSnapshot { seen, pending })
    }

    // ===== Metadata =====

    /// Sets a metadata key, replacing any previous value
    pub fn set_meta(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO crawl_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Gets a metadata value by key
    pub fn get_meta(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM crawl_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_then_get() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page("https://example.com/", "Home", "welcome text")
            .unwrap();

        let doc = storage.get_page("https://example.com/").unwrap().unwrap();
        assert_eq!(doc.title, "Home");
        assert_eq!(doc.content, "welcome text");
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page("https://example.com/", "First", "content one")
            .unwrap();
        storage
            .upsert_page("https://example.com/", "Second", "content two")
            .unwrap();

        assert_eq!(storage.count_documents().unwrap(), 1);
        let doc = storage.get_page("https://example.com/").unwrap().unwrap();
        assert_eq!(doc.title, "Second");
        assert_eq!(doc.content, "content two");
    }

    #[test]
    fn test_search_ranks_and_snippets() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(
                "https://example.com/rust",
                "Rust",
                "rust is a systems programming language focused on safety",
            )
            .unwrap();
        storage
            .upsert_page(
                "https://example.com/other",
                "Other",
                "a page about gardening",
            )
            .unwrap();

        let hits = storage.search_pages("rust", 10, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://example.com/rust");
        assert!(hits[0].snip.contains("<mark>"));
        assert_eq!(storage.count_matches("rust").unwrap(), 1);
    }

    #[test]
    fn test_porter_stemming_matches_variants() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page("https://example.com/", "Crawling", "crawling the web")
            .unwrap();

        assert_eq!(storage.count_matches("crawl").unwrap(), 1);
    }

    #[test]
    fn test_malformed_match_expression_errors() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.search_pages("\"unclosed", 10, 0).is_err());
        assert!(storage.count_matches("AND AND").is_err());
    }

    #[test]
    fn test_frontier_snapshot_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let snapshot = FrontierSnapshot {
            seen: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
            pending: vec![("https://example.com/b".to_string(), 95.0)],
        };
        storage.save_frontier_snapshot(&snapshot).unwrap();

        let loaded = storage.load_frontier_snapshot().unwrap();
        assert_eq!(loaded.seen.len(), 2);
        assert_eq!(
            loaded.pending,
            vec![("https://example.com/b".to_string(), 95.0)]
        );
        assert!(storage.get_meta("snapshot-saved-at").unwrap().is_some());
    }

    #[test]
    fn test_snapshot_save_is_replacing() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .save_frontier_snapshot(&FrontierSnapshot {
                seen: vec!["https://example.com/old".to_string()],
                pending: vec![("https://example.com/old".to_string(), 1.0)],
            })
            .unwrap();
        storage
            .save_frontier_snapshot(&FrontierSnapshot {
                seen: vec!["https://example.com/new".to_string()],
                pending: vec![],
            })
            .unwrap();

        let loaded = storage.load_frontier_snapshot().unwrap();
        assert_eq!(loaded.seen, vec!["https://example.com/new"]);
        assert!(loaded.pending.is_empty());
    }

    #[test]
    fn test_empty_snapshot_when_fresh() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let loaded = storage.load_frontier_snapshot().unwrap();
        assert!(loaded.seen.is_empty());
        assert!(loaded.pending.is_empty());
    }

    #[test]
    fn test_meta_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.get_meta("config-hash").unwrap().is_none());
        storage.set_meta("config-hash", "abc123").unwrap();
        storage.set_meta("config-hash", "def456").unwrap();
        assert_eq!(
            storage.get_meta("config-hash").unwrap().as_deref(),
            Some("def456")
        );
    }
}

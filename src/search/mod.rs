//! Search engine: ranked, paginated queries over the full-text index
//!
//! Reads whatever the crawl has committed so far. Queries use the FTS5 match
//! mini-language (space-separated terms are implicitly ANDed) with BM25
//! ranking; malformed expressions degrade to an empty result set instead of
//! surfacing a parse error.

use std::path::PathBuf;

use serde::Serialize;

use crate::storage::{SearchHit, SqliteStorage};

/// One page of search results
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub total: u64,
    pub page: usize,
    pub per_page: usize,
    pub last_page: usize,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    fn empty(query: &str, per_page: usize) -> Self {
        Self {
            query: query.to_string(),
            total: 0,
            page: 1,
            per_page,
            last_page: 1,
            hits: Vec::new(),
        }
    }
}

/// Query interface over the document index.
///
/// Opens a fresh read connection per query; WAL journaling keeps readers off
/// the crawl writers' path, and a page becomes visible as soon as its upsert
/// transaction commits.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    db_path: PathBuf,
}

impl SearchEngine {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Runs a search and paginates the ranked hits.
    ///
    /// `per_page` and `page` are expected caller-clamped (both >= 1); `page`
    /// is floored at 1 regardless. An empty or missing query short-circuits
    /// without touching storage.
    pub fn search(&self, query: Option<&str>, per_page: usize, page: usize) -> SearchResults {
        let query = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => q,
            None => return SearchResults::empty("", per_page),
        };

        let page = page.max(1);
        let offset = (page - 1) * per_page;

        let storage = match SqliteStorage::new(&self.db_path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Search storage unavailable: {}", e);
                return SearchResults::empty(query, per_page);
            }
        };

        // Malformed match expressions (unbalanced quotes, stray operators)
        // come back as errors from FTS5 and degrade to the empty shape.
        let total = match storage.count_matches(query) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("Match query rejected: {}", e);
                return SearchResults::empty(query, per_page);
            }
        };
        let hits = match storage.search_pages(query, per_page, offset) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::debug!("Match query rejected: {}", e);
                return SearchResults::empty(query, per_page);
            }
        };

        let per = per_page as u64;
        let last_page = std::cmp::max((total + per - 1) / per, 1) as usize;

        SearchResults {
            query: query.to_string(),
            total,
            page,
            per_page,
            last_page,
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine_with_docs(count: usize) -> (TempDir, SearchEngine) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("search.db");
        let mut storage = SqliteStorage::new(&db_path).unwrap();
        for i in 0..count {
            storage
                .upsert_page(
                    &format!("https://example.com/{i}"),
                    &format!("Doc {i}"),
                    "shared corpus term plus unique filler",
                )
                .unwrap();
        }
        (dir, SearchEngine::new(db_path))
    }

    #[test]
    fn test_empty_query_short_circuits_without_storage() {
        // A path that cannot be opened proves storage is never touched
        let engine = SearchEngine::new("/nonexistent/dir/search.db");
        let results = engine.search(None, 10, 1);

        assert_eq!(results.total, 0);
        assert_eq!(results.page, 1);
        assert_eq!(results.last_page, 1);
        assert!(results.hits.is_empty());
    }

    #[test]
    fn test_whitespace_query_treated_as_empty() {
        let engine = SearchEngine::new("/nonexistent/dir/search.db");
        let results = engine.search(Some("   "), 10, 1);
        assert_eq!(results.total, 0);
        assert!(results.hits.is_empty());
    }

    #[test]
    fn test_basic_search_returns_hits() {
        let (_dir, engine) = engine_with_docs(3);
        let results = engine.search(Some("corpus"), 10, 1);

        assert_eq!(results.total, 3);
        assert_eq!(results.hits.len(), 3);
        assert_eq!(results.last_page, 1);
        assert_eq!(results.query, "corpus");
    }

    #[test]
    fn test_pagination_window_and_last_page() {
        let (_dir, engine) = engine_with_docs(101);

        let results = engine.search(Some("corpus"), 10, 1);
        assert_eq!(results.total, 101);
        assert_eq!(results.hits.len(), 10);
        assert_eq!(results.last_page, 11);

        let results = engine.search(Some("corpus"), 10, 11);
        assert_eq!(results.hits.len(), 1);

        // Requesting past the end is empty but keeps the bookkeeping
        let results = engine.search(Some("corpus"), 10, 12);
        assert!(results.hits.is_empty());
        assert_eq!(results.total, 101);
        assert_eq!(results.last_page, 11);
        assert_eq!(results.page, 12);
    }

    #[test]
    fn test_malformed_query_degrades_to_empty() {
        let (_dir, engine) = engine_with_docs(3);
        let results = engine.search(Some("\"unclosed"), 10, 1);

        assert_eq!(results.total, 0);
        assert_eq!(results.page, 1);
        assert_eq!(results.last_page, 1);
        assert!(results.hits.is_empty());
        assert_eq!(results.query, "\"unclosed");
    }

    #[test]
    fn test_no_matches_is_page_one_of_one() {
        let (_dir, engine) = engine_with_docs(3);
        let results = engine.search(Some("zebra"), 10, 1);
        assert_eq!(results.total, 0);
        assert_eq!(results.last_page, 1);
        assert!(results.hits.is_empty());
    }
}

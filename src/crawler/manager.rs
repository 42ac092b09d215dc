//! Crawl manager: startup, seeding, worker pool, keepalive
//!
//! The manager owns process lifecycle: it opens storage (failing fast when
//! the store is unreachable), restores any persisted frontier, seeds it,
//! spawns the worker pool, and then loops forever reporting progress and
//! snapshotting the frontier. Workers are daemon-style tasks that terminate
//! with the process; there is no graceful shutdown protocol.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::worker::{run_worker, WorkerContext};
use crate::frontier::{FrontierStore, MemoryFrontier, DEFAULT_SCORE};
use crate::storage::SqliteStorage;
use crate::url::Canonicalizer;
use crate::{DredgeError, Result};

/// How often the keepalive loop logs progress and persists the frontier
const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the crawl until the process is stopped externally.
///
/// Returns only on startup failure (unreachable storage, invalid seeds);
/// afterwards the keepalive loop never exits.
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<()> {
    let db_path = Path::new(&config.storage.database_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut storage = SqliteStorage::new(db_path)?;
    storage.set_meta("config-hash", config_hash)?;

    let canonicalizer = Canonicalizer::new(config.crawler.tracking_params.clone());
    let frontier = Arc::new(MemoryFrontier::new());

    let snapshot = storage.load_frontier_snapshot()?;
    if !snapshot.seen.is_empty() {
        tracing::info!(
            "Restoring persisted frontier: {} seen, {} pending",
            snapshot.seen.len(),
            snapshot.pending.len()
        );
        frontier.restore(snapshot);
    }

    let mut seeded = 0;
    for seed in &config.crawler.seeds {
        let canonical = canonicalizer
            .canonicalize_absolute(seed)
            .ok_or_else(|| DredgeError::InvalidSeed(seed.clone()))?;
        if frontier.add_if_new(&canonical, DEFAULT_SCORE) {
            seeded += 1;
        }
    }
    tracing::info!("Frontier initialized: {} new seed URL(s)", seeded);

    for id in 0..config.crawler.workers {
        let ctx = WorkerContext {
            id,
            client: build_http_client(&config.user_agent, config.crawler.request_timeout_secs)?,
            storage: SqliteStorage::new(db_path)?,
            frontier: Arc::clone(&frontier) as Arc<dyn FrontierStore>,
            canonicalizer: canonicalizer.clone(),
            max_outlinks: config.crawler.max_outlinks_per_page,
            idle_poll: Duration::from_millis(config.crawler.idle_poll_ms),
        };
        tokio::spawn(run_worker(ctx));
        tracing::info!("Worker {} started", id);
    }

    loop {
        tokio::time::sleep(SNAPSHOT_INTERVAL).await;

        match storage.count_documents() {
            Ok(docs) => tracing::info!(
                "Progress: {} seen, {} pending, {} document(s) indexed",
                frontier.seen_len(),
                frontier.pending_len(),
                docs
            ),
            Err(e) => tracing::warn!("Failed to read progress counters: {}", e),
        }

        if let Err(e) = storage.save_frontier_snapshot(&frontier.snapshot()) {
            tracing::warn!("Failed to persist frontier snapshot: {}", e);
        }
    }
}

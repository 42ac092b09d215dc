//! Worker execution loop
//!
//! Each worker repeats forever: pop the highest-priority URL, fetch it once,
//! act on the classification. Failed fetches are never retried in place; all
//! retry is emergent through reinsertion at reduced priority, bounded below
//! by the score floor.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::crawler::extract::{extract_document, extract_outlinks};
use crate::crawler::fetcher::{fetch_url, FetchOutcome};
use crate::frontier::{FrontierStore, DEFAULT_SCORE, SCORE_FLOOR};
use crate::storage::SqliteStorage;
use crate::url::Canonicalizer;
use crate::DredgeError;

/// Priority penalty for network and timeout failures
const TRANSIENT_PENALTY: f64 = 5.0;

/// Priority penalty for HTTP 429 and 5xx responses
const SERVER_PENALTY: f64 = 1.0;

/// Everything a single worker owns.
///
/// Workers share nothing with each other: the frontier handle and the storage
/// file are the only common ground, and each worker holds its own HTTP client
/// and database connection.
pub struct WorkerContext {
    pub id: u32,
    pub client: Client,
    pub storage: SqliteStorage,
    pub frontier: Arc<dyn FrontierStore>,
    pub canonicalizer: Canonicalizer,
    pub max_outlinks: usize,
    pub idle_poll: Duration,
}

/// What a single loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The frontier was empty; nothing was fetched
    Idle,
    /// A URL was dequeued and fully handled
    Processed,
}

/// Applies a backoff penalty, clamped to the score floor
pub fn backoff(score: f64, penalty: f64) -> f64 {
    (score - penalty).max(SCORE_FLOOR)
}

/// Performs one dequeue-fetch-handle cycle.
///
/// Factored out of [`run_worker`] so tests can drive exactly one cycle and
/// inspect the frontier and index afterwards.
pub async fn crawl_step(ctx: &mut WorkerContext) -> crate::Result<StepOutcome> {
    let (url, score) = match ctx.frontier.pop_highest() {
        Some(entry) => entry,
        None => return Ok(StepOutcome::Idle),
    };

    match fetch_url(&ctx.client, &url).await {
        FetchOutcome::Html { body } => {
            let doc = extract_document(&body);
            if doc.text.is_empty() {
                tracing::debug!("No visible text at {}, not indexing", url);
            } else {
                ctx.storage.upsert_page(&url, &doc.title, &doc.text)?;
                tracing::debug!("Indexed {} ({} chars)", url, doc.text.len());
            }

            // Outlinks are followed whether or not the page was indexable
            let base = Url::parse(&url).map_err(DredgeError::UrlParse)?;
            let discovered =
                extract_outlinks(&body, &base, &ctx.canonicalizer, ctx.max_outlinks);
            if !discovered.is_empty() {
                let added = ctx.frontier.add_batch(&discovered, DEFAULT_SCORE);
                tracing::debug!(
                    "Discovered {} outlink(s) at {}, {} new",
                    discovered.len(),
                    url,
                    added
                );
            }
        }

        FetchOutcome::ServerOrRateLimit { status } => {
            let next = backoff(score, SERVER_PENALTY);
            tracing::debug!("HTTP {} from {}, requeued at {:.1}", status, url, next);
            ctx.frontier.reinsert(&url, next);
        }

        FetchOutcome::ClientError { status } => {
            tracing::debug!("HTTP {} from {}, dropped", status, url);
        }

        FetchOutcome::NonText { content_type } => {
            tracing::debug!("Non-text content at {} ({}), dropped", url, content_type);
        }

        FetchOutcome::Network { error } => {
            let next = backoff(score, TRANSIENT_PENALTY);
            tracing::debug!("Fetch failed for {}: {}, requeued at {:.1}", url, error, next);
            ctx.frontier.reinsert(&url, next);
        }
    }

    Ok(StepOutcome::Processed)
}

/// Runs a worker until the process is stopped.
///
/// Step errors (storage hiccups, unparseable canonical URLs) are logged and
/// the loop keeps going; a worker never takes the pool down with it.
pub async fn run_worker(mut ctx: WorkerContext) {
    loop {
        match crawl_step(&mut ctx).await {
            Ok(StepOutcome::Idle) => tokio::time::sleep(ctx.idle_poll).await,
            Ok(StepOutcome::Processed) => {}
            Err(e) => tracing::error!("Worker {}: step failed: {}", ctx.id, e),
        }
    }
}

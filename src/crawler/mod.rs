//! Crawler module: fetch, extract, index, repeat
//!
//! A fixed pool of workers drains the shared frontier. Each worker performs
//! one bounded fetch per dequeued URL, classifies the response, indexes the
//! extracted text, and feeds discovered outlinks back into the frontier.

mod extract;
mod fetcher;
mod manager;
mod worker;

pub use extract::{extract_document, extract_outlinks, ExtractedDoc};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use manager::run_crawl;
pub use worker::{backoff, crawl_step, run_worker, StepOutcome, WorkerContext};

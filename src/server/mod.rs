//! HTTP surface for the search engine
//!
//! Three routes: an interactive page at `/`, the JSON API at `/api/search`,
//! and `/health`. The handlers clamp query parameters to the configured caps
//! before anything reaches the search core.

mod routes;

use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ServerConfig};
use crate::search::SearchEngine;
use crate::storage::SqliteStorage;
use crate::Result;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub engine: SearchEngine,
    pub server: ServerConfig,
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::search_page))
        .route("/api/search", get(routes::api_search))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the search server until the process is stopped.
///
/// Opens the database once up front so an unreachable store fails the process
/// at startup instead of surfacing per-request.
pub async fn run_server(config: Config) -> Result<()> {
    let db_path = Path::new(&config.storage.database_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStorage::new(db_path)?;

    let state = AppState {
        engine: SearchEngine::new(db_path),
        server: config.server.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("Search server listening on {}", config.server.bind_addr);
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

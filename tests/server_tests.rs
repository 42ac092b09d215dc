//! Integration tests for the HTTP search surface

use std::net::SocketAddr;
use std::path::PathBuf;

use tempfile::TempDir;

use dredge::config::ServerConfig;
use dredge::search::SearchEngine;
use dredge::server::{build_router, AppState};
use dredge::storage::SqliteStorage;

fn test_server_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        results_per_page: 10,
        max_per_page: 50,
        max_page: 1000,
        max_query_len: 512,
    }
}

/// Indexes `count` documents and serves the router on an ephemeral port
async fn spawn_server(dir: &TempDir, count: usize) -> SocketAddr {
    let db_path: PathBuf = dir.path().join("search.db");
    let mut storage = SqliteStorage::new(&db_path).expect("Failed to open storage");
    for i in 0..count {
        storage
            .upsert_page(
                &format!("https://example.com/{i}"),
                &format!("Doc {i}"),
                "indexed corpus text",
            )
            .expect("Failed to index");
    }

    let state = AppState {
        engine: SearchEngine::new(db_path),
        server: test_server_config(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 0).await;

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn test_index_page_served() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 0).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("<form"));
}

#[tokio::test]
async fn test_api_search_returns_ranked_hits() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 3).await;

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/api/search?q=corpus"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["query"], "corpus");
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["last_page"], 1);
    assert_eq!(body["hits"].as_array().unwrap().len(), 3);

    let hit = &body["hits"][0];
    assert!(hit["url"].as_str().unwrap().starts_with("https://example.com/"));
    assert!(hit["snip"].as_str().unwrap().contains("<mark>"));
    assert!(hit["rank"].is_number());
}

#[tokio::test]
async fn test_api_search_empty_query() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 3).await;

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/api/search"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["last_page"], 1);
    assert_eq!(body["hits"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_api_search_pagination() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 25).await;

    let body: serde_json::Value =
        reqwest::get(format!("http://{addr}/api/search?q=corpus&limit=10&page=3"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 3);
    assert_eq!(body["last_page"], 3);
    assert_eq!(body["hits"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_api_search_clamps_garbage_params() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 3).await;

    let body: serde_json::Value = reqwest::get(format!(
        "http://{addr}/api/search?q=corpus&limit=notanumber&page=-4"
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    assert_eq!(body["per_page"], 10);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_api_search_malformed_expression_degrades() {
    let dir = TempDir::new().unwrap();
    let addr = spawn_server(&dir, 3).await;

    let response = reqwest::get(format!("http://{addr}/api/search?q=%22unclosed"))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(body["hits"].as_array().unwrap().len(), 0);
}

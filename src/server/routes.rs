//! Request handlers for the search surface

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::search::SearchResults;
use crate::server::AppState;

/// Raw query parameters as they arrive; everything is optional and garbage
/// falls back to defaults rather than erroring
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// `GET /api/search` — JSON search API
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults> {
    let (query, per_page, page) = clamp_params(&state.server, &params);
    Json(state.engine.search(query.as_deref(), per_page, page))
}

/// `GET /health` — liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// `GET /` — interactive search page backed by the JSON API
pub async fn search_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Applies the configured caps: query trimmed and truncated, `limit` within
/// [1, max-per-page], `page` within [1, max-page]
fn clamp_params(config: &ServerConfig, params: &SearchParams) -> (Option<String>, usize, usize) {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| q.chars().take(config.max_query_len).collect::<String>());

    let per_page = parse_pos_int(params.limit.as_deref(), config.results_per_page)
        .min(config.max_per_page);
    let page = parse_pos_int(params.page.as_deref(), 1).min(config.max_page);

    (query, per_page, page)
}

/// Parses a positive integer, falling back to `default` and flooring at 1
fn parse_pos_int(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
        .max(1)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Dredge Search</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  form { display: flex; gap: .5rem; }
  input[type=search] { flex: 1; padding: .5rem; font-size: 1rem; }
  button { padding: .5rem 1rem; }
  .hit { margin: 1.25rem 0; }
  .hit a { font-size: 1.05rem; }
  .hit .url { color: #227744; font-size: .85rem; word-break: break-all; }
  .hit .snip mark { background: #ffe58a; }
  .meta { color: #666; margin-top: 1rem; }
  nav button { margin-right: .5rem; }
</style>
</head>
<body>
<h1>Dredge</h1>
<form id="f">
  <input type="search" id="q" placeholder="Search indexed pages" autofocus>
  <button type="submit">Search</button>
</form>
<div class="meta" id="meta"></div>
<div id="results"></div>
<nav id="nav"></nav>
<script>
const form = document.getElementById('f');
const input = document.getElementById('q');
let page = 1;

form.addEventListener('submit', (e) => { e.preventDefault(); page = 1; run(); });

async function run() {
  const q = input.value.trim();
  if (!q) return;
  const res = await fetch(`/api/search?q=${encodeURIComponent(q)}&page=${page}`);
  const data = await res.json();
  render(data);
}

function render(data) {
  document.getElementById('meta').textContent =
    `${data.total} result(s) — page ${data.page} of ${data.last_page}`;
  const results = document.getElementById('results');
  results.innerHTML = '';
  for (const hit of data.hits) {
    const div = document.createElement('div');
    div.className = 'hit';
    const a = document.createElement('a');
    a.href = hit.url;
    a.textContent = hit.title || hit.url;
    const url = document.createElement('div');
    url.className = 'url';
    url.textContent = hit.url;
    const snip = document.createElement('div');
    snip.className = 'snip';
    snip.innerHTML = hit.snip;
    div.append(a, url, snip);
    results.append(div);
  }
  const nav = document.getElementById('nav');
  nav.innerHTML = '';
  if (data.page > 1) nav.append(navButton('Previous', data.page - 1));
  if (data.page < data.last_page) nav.append(navButton('Next', data.page + 1));
}

function navButton(label, target) {
  const b = document.createElement('button');
  b.textContent = label;
  b.addEventListener('click', () => { page = target; run(); });
  return b;
}
</script>
</body>
</html>
"#;

//! HTTP fetcher implementation
//!
//! One bounded GET per dequeued URL, classified into the retry taxonomy the
//! worker loop acts on. Redirects follow reqwest's default policy; the final
//! response is what gets classified.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Classified result of a fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with an HTML or generic text content type
    Html {
        /// Raw response body
        body: String,
    },

    /// HTTP 429 or a 5xx: transient on the server side, retryable
    ServerOrRateLimit { status: u16 },

    /// Any other unsuccessful status: terminal, the URL is dropped
    ClientError { status: u16 },

    /// HTTP 200 but not a text content type: terminal
    NonText { content_type: String },

    /// Connection, timeout, or body-read failure: retryable
    Network { error: String },
}

/// Builds the HTTP client a worker owns for its lifetime
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one bounded fetch and classifies the response
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchOutcome::Network { error };
        }
    };

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return FetchOutcome::ServerOrRateLimit {
            status: status.as_u16(),
        };
    }
    if status != StatusCode::OK {
        return FetchOutcome::ClientError {
            status: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_text_content(&content_type) {
        return FetchOutcome::NonText { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html { body },
        Err(e) => FetchOutcome::Network {
            error: e.to_string(),
        },
    }
}

/// Content types the extractor can make sense of
fn is_text_content(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.starts_with("text/")
}

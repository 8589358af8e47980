use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::Config;

const MAX_RETRIES: u32 = 2;
const BASE_BACKOFF_MS: u64 = 1500;

/// One fetched page. Discarded after extraction.
pub struct RawPage {
    pub url: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    Client::builder()
        .timeout(cfg.request_timeout)
        .default_headers(browser_headers())
        .build()
        .context("Failed to build HTTP client")
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

/// GET one page, retrying on rate limits, server errors and transport
/// failures with exponential backoff. Any other non-200 fails immediately.
pub async fn fetch_page(client: &Client, url: &str) -> Result<RawPage> {
    for attempt in 0..=MAX_RETRIES {
        match try_fetch(client, url).await {
            Ok(page) => return Ok(page),
            Err(e) if attempt < MAX_RETRIES && is_retryable(&e) => {
                let backoff = std::time::Duration::from_millis(
                    BASE_BACKOFF_MS * 2u64.pow(attempt),
                );
                warn!(
                    "Fetch failed for {} (attempt {}/{}), backing off {:.1}s: {}",
                    url,
                    attempt + 1,
                    MAX_RETRIES,
                    backoff.as_secs_f64(),
                    e
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
    try_fetch(client, url).await
}

async fn try_fetch(client: &Client, url: &str) -> Result<RawPage> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {} for {}", status, url);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read body from {}", url))?;
    debug!("Fetched {} ({} bytes)", url, body.len());

    Ok(RawPage {
        url: url.to_string(),
        body,
        fetched_at: Utc::now(),
    })
}

fn is_retryable(err: &anyhow::Error) -> bool {
    if let Some(req_err) = err.downcast_ref::<reqwest::Error>() {
        return req_err.is_timeout() || req_err.is_connect();
    }
    let msg = err.to_string();
    retryable_status(&msg, StatusCode::TOO_MANY_REQUESTS)
        || retryable_status(&msg, StatusCode::INTERNAL_SERVER_ERROR)
        || retryable_status(&msg, StatusCode::BAD_GATEWAY)
        || retryable_status(&msg, StatusCode::SERVICE_UNAVAILABLE)
        || retryable_status(&msg, StatusCode::GATEWAY_TIMEOUT)
}

fn retryable_status(msg: &str, status: StatusCode) -> bool {
    msg.contains(&format!("HTTP {}", status))
}

/// Write the first N KB of a fetched page for troubleshooting.
pub fn dump_page(cfg: &Config, page_no: usize, body: &str) -> Result<PathBuf> {
    let dir = cfg.debug_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut end = cfg.debug_dump_bytes.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    let path = dir.join(format!("page_{}.html", page_no));
    std::fs::write(&path, &body[..end])
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

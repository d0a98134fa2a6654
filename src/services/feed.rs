// src/services/feed.rs

//! Retrying feed fetcher.
//!
//! Acquires the full NDJSON job stream from the feed endpoint. Transport
//! failures, 5xx and 429 responses are retried with exponential backoff;
//! any other non-success status and any malformed line are fatal
//! immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Envelope, FeedMeta, JobRecord};

/// Maximum fetch attempts per run.
pub const MAX_ATTEMPTS: u32 = 5;

/// Initial backoff delay; doubles after each failed attempt (3s, 6s, 12s, 24s).
pub const BASE_BACKOFF: Duration = Duration::from_secs(3);

/// Per-attempt wall-clock budget. The feed can be several megabytes over a
/// slow link, so this is generous; exceeding it is a retryable failure.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(360);

/// Header carrying the caller identity token.
const CLIENT_HEADER: &str = "x-feed-client";

/// The two logical parts of a fetched feed.
#[derive(Debug, Default)]
pub struct FeedPayload {
    /// Stream metadata (logo map); defaulted when no `meta` envelope appeared
    pub meta: FeedMeta,
    /// Job records in stream order
    pub jobs: Vec<JobRecord>,
}

/// HTTP client for the feed endpoint.
pub struct FeedClient {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl FeedClient {
    /// Build a client with the identity header and per-attempt timeout.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.api.token)
            .map_err(|e| AppError::config(format!("api.token is not a valid header: {e}")))?;
        headers.insert(CLIENT_HEADER, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/x-ndjson"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(ATTEMPT_TIMEOUT)
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.config.api.base_url)?.join("feed/jobs.ndjson")?;
        url.query_pairs_mut()
            .append_pair("hours", &self.config.api.lookback_hours.to_string());
        Ok(url)
    }

    /// Fetch and parse the full feed, retrying transient failures.
    pub async fn fetch(&self) -> Result<FeedPayload> {
        let url = self.endpoint()?;
        log::info!("Fetching feed from {url}");
        with_retries(MAX_ATTEMPTS, BASE_BACKOFF, || self.fetch_once(&url)).await
    }

    async fn fetch_once(&self, url: &url::Url) -> Result<FeedPayload> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        parse_feed(&body)
    }
}

/// Run `op` up to `max_attempts` times, sleeping with exponential backoff
/// between retryable failures. Non-retryable errors propagate immediately;
/// exhaustion wraps the last error.
pub async fn with_retries<T, F, Fut>(max_attempts: u32, base_delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = base_delay;
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                return Err(AppError::RetriesExhausted {
                    attempts: max_attempts,
                    last: e.to_string(),
                });
            }
            Err(e) => {
                log::warn!(
                    "Fetch attempt {attempt}/{max_attempts} failed: {e}; retrying in {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

/// Parse a complete NDJSON body into metadata and job records.
///
/// Blank lines are skipped; `done` and unknown tags are ignored; a `meta`
/// envelope overwrites any earlier one (last wins). A line that fails to
/// parse fails the whole feed.
pub fn parse_feed(body: &str) -> Result<FeedPayload> {
    let mut payload = FeedPayload::default();
    for (idx, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let envelope: Envelope =
            serde_json::from_str(line).map_err(|e| AppError::feed(idx + 1, e))?;
        match envelope {
            Envelope::Meta(meta) => payload.meta = meta,
            Envelope::Job(job) => payload.jobs.push(*job),
            Envelope::Done | Envelope::Unknown => {}
        }
    }
    Ok(payload)
}

//! HTTP client for the product-receiver service.

mod health;
mod stores;

use std::sync::Arc;
use std::time::Duration;

use grocery_core::{DeliveryConfig, RecordKind, ScrapedRecord};
use reqwest::{Client, Response, StatusCode, Url};
use tokio::sync::Semaphore;

use crate::error::DeliveryError;
use crate::retry::retry_with_backoff;
use crate::types::{Submission, WriteResponse};
use crate::REJECT_LOG_TARGET;

/// Longest response body kept in an error, in characters.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the receiving REST API.
///
/// Owns one connection pool and a semaphore that caps the number of HTTP
/// requests in flight across every clone of the client. Transient failures
/// (5xx, network errors) are retried with exponential backoff; 4xx responses
/// fail immediately.
#[derive(Clone)]
pub struct DeliveryClient {
    client: Client,
    /// `{base_url}/api/`
    api_url: Url,
    product_url: Url,
    store_url: Url,
    health_url: Url,
    gate: Arc<Semaphore>,
    max_retries: u32,
    backoff_factor: f64,
    max_concurrent_requests: usize,
    health_timeout: Duration,
    health_poll_interval: Duration,
}

impl DeliveryClient {
    /// Creates a client from an explicit delivery configuration.
    ///
    /// The connection pool keeps up to `max_concurrent_requests` idle
    /// connections so a full batch reuses them instead of reconnecting.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    /// - [`DeliveryError::InvalidBaseUrl`] if `base_url` does not parse as an
    ///   absolute http(s) URL.
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let max_concurrent_requests = config.max_concurrent_requests.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(max_concurrent_requests)
            .build()?;

        let api_url = api_base_url(&config.base_url)?;
        let product_url = join_segments(&api_url, &[RecordKind::Product.as_str()])?;
        let store_url = join_segments(&api_url, &[RecordKind::Store.as_str()])?;
        let health_url = join_segments(&api_url, &["health"])?;

        Ok(Self {
            client,
            api_url,
            product_url,
            store_url,
            health_url,
            gate: Arc::new(Semaphore::new(max_concurrent_requests)),
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
            max_concurrent_requests,
            health_timeout: Duration::from_secs(config.health_timeout_secs),
            health_poll_interval: Duration::from_secs(config.health_poll_interval_secs.max(1)),
        })
    }

    /// Write endpoint for records of `kind`: `{base_url}/api/{product|store}`.
    #[must_use]
    pub fn endpoint_url(&self, kind: RecordKind) -> &Url {
        match kind {
            RecordKind::Product => &self.product_url,
            RecordKind::Store => &self.store_url,
        }
    }

    /// Ceiling on concurrent HTTP requests.
    #[must_use]
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Posts one canonical record to its endpoint, retrying transient
    /// failures.
    ///
    /// A concurrency permit is held only while a request is in flight, never
    /// during a backoff sleep.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Rejected`]: 4xx, returned after a single attempt.
    /// - [`DeliveryError::ServerError`] / [`DeliveryError::Http`]: the last
    ///   transient failure once retries are exhausted.
    /// - [`DeliveryError::UnexpectedStatus`]: 1xx/3xx, not retried.
    /// - [`DeliveryError::Serialize`] if the record cannot be encoded.
    pub async fn submit(&self, record: &ScrapedRecord) -> Result<Submission, DeliveryError> {
        let kind = record.kind();
        let url = self.endpoint_url(kind);
        let payload = serde_json::to_vec(record).map_err(|e| DeliveryError::Serialize {
            context: format!("{kind} \"{}\"", record.display_name()),
            source: e,
        })?;

        let result = retry_with_backoff(self.max_retries, self.backoff_factor, |attempt| {
            let payload = payload.clone();
            async move {
                let _permit = self.gate.acquire().await.ok();
                tracing::debug!(%url, attempt, "posting record");

                let response = self
                    .client
                    .post(url.clone())
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(payload)
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(status_error(response, url).await);
                }

                // The record is already accepted; an unreadable ack must not
                // trigger a second POST.
                let body = response.text().await.unwrap_or_default();
                let ack = serde_json::from_str::<WriteResponse>(&body).unwrap_or_default();
                Ok(Submission {
                    kind,
                    attempts: attempt,
                    status: status.as_u16(),
                    action: ack.action,
                })
            }
        })
        .await;

        match &result {
            Ok(submission) => tracing::info!(
                kind = %kind,
                name = record.display_name(),
                grocery = record.grocery(),
                status = submission.status,
                attempts = submission.attempts,
                action = submission.action.as_deref().unwrap_or("-"),
                "record submitted"
            ),
            Err(err) if err.is_permanent() => tracing::error!(
                target: REJECT_LOG_TARGET,
                kind = %kind,
                name = record.display_name(),
                grocery = record.grocery(),
                status = err.status(),
                error = %err,
                record = %String::from_utf8_lossy(&payload),
                "record rejected by receiver"
            ),
            Err(err) => tracing::error!(
                target: REJECT_LOG_TARGET,
                kind = %kind,
                name = record.display_name(),
                grocery = record.grocery(),
                max_retries = self.max_retries,
                error = %err,
                record = %String::from_utf8_lossy(&payload),
                "record delivery failed"
            ),
        }

        result
    }

    /// Builds `{base_url}/api/{segments...}` with each segment
    /// percent-encoded.
    fn api_path(&self, segments: &[&str]) -> Result<Url, DeliveryError> {
        join_segments(&self.api_url, segments)
    }
}

/// Normalizes a configured base URL to `{origin}[/prefix]/api/`.
///
/// Trailing slashes and one trailing `/api` segment are stripped first, so
/// `http://host:3002`, `http://host:3002/` and `http://host:3002/api/` all
/// resolve to the same API root.
fn api_base_url(base_url: &str) -> Result<Url, DeliveryError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let root = trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let invalid = |reason: String| DeliveryError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason,
    };

    let url = Url::parse(&format!("{root}/api/")).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_owned()));
    }
    Ok(url)
}

fn join_segments(api_url: &Url, segments: &[&str]) -> Result<Url, DeliveryError> {
    let mut url = api_url.clone();
    url.path_segments_mut()
        .map_err(|()| DeliveryError::InvalidBaseUrl {
            base_url: api_url.to_string(),
            reason: "URL cannot be used as a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Consumes a non-2xx response and maps it to the matching error variant,
/// keeping a truncated copy of the body.
pub(crate) async fn status_error(response: Response, url: &Url) -> DeliveryError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify_status(status, url.as_str(), truncate_body(&body))
}

fn classify_status(status: StatusCode, url: &str, body: String) -> DeliveryError {
    let url = url.to_owned();
    let status = status.as_u16();
    match status {
        400..=499 => DeliveryError::Rejected { status, url, body },
        500..=599 => DeliveryError::ServerError { status, url, body },
        _ => DeliveryError::UnexpectedStatus { status, url },
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

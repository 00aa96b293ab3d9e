//! Retry with exponential backoff for the delivery client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 5xx). 4xx rejections and every other
//! error are returned immediately, without sleeping.

use std::future::Future;
use std::time::Duration;

use crate::error::DeliveryError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_SECS: f64 = 60.0;

/// Returns `true` for errors that are worth retrying after a backoff delay.
///
/// **Retriable:**
/// - [`DeliveryError::Http`] raised while connecting, sending, or waiting for
///   the response (timeouts included).
/// - [`DeliveryError::ServerError`]: 5xx from the receiving service.
///
/// **Not retriable:**
/// - [`DeliveryError::Rejected`]: 4xx, the receiver will refuse it again.
/// - [`DeliveryError::Http`] raised while *building* the request.
/// - everything else (unexpected status, bad JSON, bad config).
pub(crate) fn is_retriable(err: &DeliveryError) -> bool {
    match err {
        DeliveryError::Http(e) => {
            !e.is_builder() && (e.is_timeout() || e.is_connect() || e.is_request() || e.is_body())
        }
        DeliveryError::ServerError { .. } => true,
        DeliveryError::Rejected { .. }
        | DeliveryError::UnexpectedStatus { .. }
        | DeliveryError::Serialize { .. }
        | DeliveryError::Deserialize { .. }
        | DeliveryError::InvalidBaseUrl { .. }
        | DeliveryError::ServiceUnavailable { .. } => false,
    }
}

/// Sleep before retry number `attempt` (1-based): `backoff_factor^attempt`
/// seconds, capped at 60 s.
///
/// | `backoff_factor` | retry 1 | retry 2 | retry 3 |
/// |------------------|---------|---------|---------|
/// | 2.0              | 2 s     | 4 s     | 8 s     |
/// | 1.5              | 1.5 s   | 2.25 s  | 3.375 s |
/// | 0.0              | 0 s     | 0 s     | 0 s     |
#[must_use]
pub fn backoff_delay(backoff_factor: f64, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let secs = backoff_factor.powi(exponent);
    if secs.is_finite() && secs >= 0.0 {
        Duration::from_secs_f64(secs.min(MAX_DELAY_SECS))
    } else {
        Duration::from_secs_f64(MAX_DELAY_SECS)
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors.
///
/// `operation` receives the 1-based attempt number. With `max_retries = 3` the
/// operation runs at most 4 times. When retries are exhausted the last error
/// is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_factor: f64,
    mut operation: F,
) -> Result<T, DeliveryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DeliveryError>>,
{
    let mut retry = 0u32;
    loop {
        match operation(retry + 1).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || retry >= max_retries {
                    return Err(err);
                }
                retry += 1;
                let delay = backoff_delay(backoff_factor, retry);
                tracing::warn!(
                    retry,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient delivery error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

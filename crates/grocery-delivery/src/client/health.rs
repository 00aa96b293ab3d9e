use reqwest::StatusCode;
use tokio::time::Instant;

use super::{status_error, DeliveryClient};
use crate::error::DeliveryError;
use crate::REJECT_LOG_TARGET;

impl DeliveryClient {
    /// Sends one `GET {base_url}/api/health` probe.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Http`] when the service cannot be reached, or a
    /// status error for anything other than `200 OK`.
    pub async fn health_check(&self) -> Result<(), DeliveryError> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        if response.status() == StatusCode::OK {
            return Ok(());
        }
        if response.status().is_success() {
            return Err(DeliveryError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: self.health_url.to_string(),
            });
        }
        Err(status_error(response, &self.health_url).await)
    }

    /// Polls the health endpoint until it answers `200 OK`.
    ///
    /// Probes every `health_poll_interval_secs` until `health_timeout_secs`
    /// have elapsed. Each probe is cut short at the deadline. A zero timeout
    /// fails without probing.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ServiceUnavailable`] if no probe succeeded in
    /// time.
    pub async fn wait_for_service(&self) -> Result<(), DeliveryError> {
        let deadline = Instant::now() + self.health_timeout;
        let mut probes = 0u32;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            probes += 1;
            match tokio::time::timeout(remaining, self.health_check()).await {
                Ok(Ok(())) => {
                    tracing::info!(url = %self.health_url, probes, "receiving service is ready");
                    return Ok(());
                }
                Ok(Err(err)) => {
                    tracing::debug!(probes, error = %err, "receiving service not ready yet");
                }
                Err(_) => tracing::debug!(probes, "health probe cut off at the deadline"),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            tokio::time::sleep(self.health_poll_interval.min(remaining)).await;
        }

        let timeout_secs = self.health_timeout.as_secs();
        tracing::error!(
            target: REJECT_LOG_TARGET,
            url = %self.health_url,
            probes,
            timeout_secs,
            "receiving service did not become ready"
        );
        Err(DeliveryError::ServiceUnavailable {
            url: self.health_url.to_string(),
            timeout_secs,
        })
    }
}

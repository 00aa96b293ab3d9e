use reqwest::Url;

use super::{status_error, DeliveryClient};
use crate::error::DeliveryError;
use crate::retry::retry_with_backoff;
use crate::types::{StoreListing, StoresResponse};

impl DeliveryClient {
    /// Lists every store the receiver knows: `GET {base_url}/api/store`.
    ///
    /// # Errors
    ///
    /// - status and network errors as for [`DeliveryClient::submit`].
    /// - [`DeliveryError::Deserialize`] if the body is not a
    ///   `{"stores": [...]}` envelope.
    pub async fn list_stores(&self) -> Result<Vec<StoreListing>, DeliveryError> {
        let url = self.api_path(&["store"])?;
        self.fetch_stores(url).await
    }

    /// Lists the stores of one chain in one city:
    /// `GET {base_url}/api/store/{grocery}/{city}`.
    ///
    /// Both path segments are percent-encoded, so names with spaces or
    /// slashes are sent verbatim.
    ///
    /// # Errors
    ///
    /// Same as [`DeliveryClient::list_stores`].
    pub async fn find_stores(
        &self,
        grocery: &str,
        city: &str,
    ) -> Result<Vec<StoreListing>, DeliveryError> {
        let url = self.api_path(&["store", grocery, city])?;
        self.fetch_stores(url).await
    }

    async fn fetch_stores(&self, url: Url) -> Result<Vec<StoreListing>, DeliveryError> {
        retry_with_backoff(self.max_retries, self.backoff_factor, |attempt| {
            let url = url.clone();
            async move {
                let _permit = self.gate.acquire().await.ok();
                tracing::debug!(%url, attempt, "fetching stores");

                let response = self.client.get(url.clone()).send().await?;
                if !response.status().is_success() {
                    return Err(status_error(response, &url).await);
                }

                let body = response.text().await?;
                let envelope: StoresResponse =
                    serde_json::from_str(&body).map_err(|e| DeliveryError::Deserialize {
                        context: url.to_string(),
                        source: e,
                    })?;
                Ok(envelope.stores)
            }
        })
        .await
    }
}

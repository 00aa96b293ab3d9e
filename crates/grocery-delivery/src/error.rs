use thiserror::Error;

/// Errors returned by the delivery client.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The receiving service answered 5xx. Transient.
    #[error("server error {status} from {url}: {body}")]
    ServerError {
        status: u16,
        url: String,
        body: String,
    },

    /// The receiving service refused the request with 4xx. Permanent: the
    /// record is malformed as far as the receiver is concerned.
    #[error("rejected with {status} by {url}: {body}")]
    Rejected {
        status: u16,
        url: String,
        body: String,
    },

    /// Any other non-2xx status (1xx, 3xx).
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to encode {context} as JSON: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The health endpoint did not answer 200 before the startup timeout.
    #[error("service at {url} not ready within {timeout_secs}s")]
    ServiceUnavailable { url: String, timeout_secs: u64 },
}

impl DeliveryError {
    /// `true` for 4xx rejections, which are never retried.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryError::Rejected { .. })
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::ServerError { status, .. }
            | DeliveryError::Rejected { status, .. }
            | DeliveryError::UnexpectedStatus { status, .. } => Some(*status),
            DeliveryError::Http(e) => e.status().map(|s| s.as_u16()),
            DeliveryError::Serialize { .. }
            | DeliveryError::Deserialize { .. }
            | DeliveryError::InvalidBaseUrl { .. }
            | DeliveryError::ServiceUnavailable { .. } => None,
        }
    }
}

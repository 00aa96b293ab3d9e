use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3002";
pub const DEFAULT_USER_AGENT: &str = "grocery-feed/0.1 (price-ingestion)";

/// Settings for the outbound delivery client.
///
/// Passed explicitly into the client constructor; nothing in the delivery
/// path reads the environment on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryConfig {
    /// Root of the receiving service, without the `/api` segment.
    pub base_url: String,
    /// Additional attempts after the first one for transient failures.
    pub max_retries: u32,
    /// Backoff base: the wait before retry `n` is `backoff_factor^n` seconds.
    pub backoff_factor: f64,
    /// Ceiling on simultaneous in-flight requests.
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub health_poll_interval_secs: u64,
    pub user_agent: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            backoff_factor: 2.0,
            max_concurrent_requests: 20,
            request_timeout_secs: 30,
            health_timeout_secs: 60,
            health_poll_interval_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub delivery: DeliveryConfig,
    pub log_level: String,
    /// File receiving every skipped or failed record for manual reprocessing.
    pub error_log_path: PathBuf,
    /// Log a progress line every this many ingested records (0 disables).
    pub progress_every: usize,
}

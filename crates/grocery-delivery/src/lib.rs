pub mod client;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod types;

pub use client::DeliveryClient;
pub use error::DeliveryError;
pub use pipeline::run_batch;
pub use report::{BatchReport, Outcome, Progress};
pub use types::{StoreListing, Submission};

/// Tracing target for every skipped or failed record and for a receiver that
/// never became ready. The binary routes it to a dedicated error log so those
/// records can be reprocessed by hand.
pub const REJECT_LOG_TARGET: &str = "grocery_feed::rejects";

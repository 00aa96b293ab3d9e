//! One batch end to end: normalize, validate, submit, count.

use futures::stream::{self, StreamExt};
use grocery_core::{RecordKind, ScrapedRecord};
use grocery_ingest::ingest_record;
use serde_json::Value;

use crate::client::DeliveryClient;
use crate::report::{BatchReport, Outcome, Progress};
use crate::REJECT_LOG_TARGET;

/// Runs one batch of raw records through the pipeline.
///
/// Every record is normalized and validated up front, without awaiting.
/// Records that fail are counted as skipped and logged with their content on
/// [`REJECT_LOG_TARGET`]. The rest are submitted with at most
/// `client.max_concurrent_requests()` in flight; completion order is not
/// preserved. Counts are folded once every submission has settled.
///
/// `kind` forces the record shape for homogeneous batches; `None` classifies
/// each record on its own. `progress_every = 0` disables progress lines.
pub async fn run_batch<I>(
    client: &DeliveryClient,
    label: &str,
    records: I,
    kind: Option<RecordKind>,
    progress_every: usize,
) -> BatchReport
where
    I: IntoIterator<Item = Value>,
{
    let (ready, mut outcomes) = ingest_batch(label, records, kind, progress_every);
    tracing::info!(
        batch = label,
        ready = ready.len(),
        skipped = outcomes.len(),
        "submitting batch"
    );

    let delivered: Vec<Outcome> = stream::iter(ready)
        .map(|record| async move {
            match client.submit(&record).await {
                Ok(submission) => Outcome::Submitted(submission),
                Err(err) => Outcome::Failed(err),
            }
        })
        .buffer_unordered(client.max_concurrent_requests())
        .collect()
        .await;
    outcomes.extend(delivered);

    let report: BatchReport = outcomes.iter().collect();
    report.log_summary(label);
    report
}

/// Splits raw records into submission-ready records and skip outcomes.
fn ingest_batch<I>(
    label: &str,
    records: I,
    kind: Option<RecordKind>,
    progress_every: usize,
) -> (Vec<ScrapedRecord>, Vec<Outcome>)
where
    I: IntoIterator<Item = Value>,
{
    let mut progress = Progress::new(label, progress_every);
    let mut ready = Vec::new();
    let mut skipped = Vec::new();

    for raw in records {
        progress.tick();
        match ingest_record(&raw, kind) {
            Ok(record) => ready.push(record),
            Err(err) => {
                tracing::warn!(
                    target: REJECT_LOG_TARGET,
                    batch = label,
                    reason = %err,
                    record = %raw,
                    "record skipped"
                );
                skipped.push(Outcome::Skipped(err));
            }
        }
    }

    (ready, skipped)
}

//! Per-record outcomes and per-batch counts.

use std::fmt;

use grocery_ingest::IngestError;

use crate::error::DeliveryError;
use crate::types::Submission;

/// What happened to one raw record.
#[derive(Debug)]
pub enum Outcome {
    /// Accepted by the receiver.
    Submitted(Submission),
    /// Dropped locally by the normalizer or validator; never sent.
    Skipped(IngestError),
    /// Sent but not accepted.
    Failed(DeliveryError),
}

impl Outcome {
    /// `true` for a failure the receiver will repeat (4xx).
    #[must_use]
    pub fn is_permanent_failure(&self) -> bool {
        matches!(self, Outcome::Failed(err) if err.is_permanent())
    }
}

/// Counts for one batch. Built by folding outcomes after every delivery task
/// has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Subset of `failed` rejected with 4xx.
    pub failed_permanent: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Submitted(_) => self.submitted += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(err) => {
                self.failed += 1;
                if err.is_permanent() {
                    self.failed_permanent += 1;
                }
            }
        }
    }

    /// Adds another batch's counts into this one.
    pub fn merge(&mut self, other: &BatchReport) {
        self.total += other.total;
        self.submitted += other.submitted;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failed_permanent += other.failed_permanent;
    }

    /// Failures that were retried until the budget ran out.
    #[must_use]
    pub fn failed_transient(&self) -> usize {
        self.failed - self.failed_permanent
    }

    /// `true` when every record in the batch was submitted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.submitted == self.total
    }

    /// Emits the one summary line per batch.
    pub fn log_summary(&self, label: &str) {
        tracing::info!(
            batch = label,
            total = self.total,
            submitted = self.submitted,
            skipped = self.skipped,
            failed = self.failed,
            failed_permanent = self.failed_permanent,
            "batch complete"
        );
    }
}

impl<'a> Extend<&'a Outcome> for BatchReport {
    fn extend<I: IntoIterator<Item = &'a Outcome>>(&mut self, outcomes: I) {
        for outcome in outcomes {
            self.record(outcome);
        }
    }
}

impl<'a> FromIterator<&'a Outcome> for BatchReport {
    fn from_iter<I: IntoIterator<Item = &'a Outcome>>(outcomes: I) -> Self {
        let mut report = BatchReport::default();
        report.extend(outcomes);
        report
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} submitted, {} skipped, {} failed ({} rejected)",
            self.total, self.submitted, self.skipped, self.failed, self.failed_permanent
        )
    }
}

/// Logs a progress line every `every` records seen.
#[derive(Debug)]
pub struct Progress<'a> {
    label: &'a str,
    every: usize,
    seen: usize,
}

impl<'a> Progress<'a> {
    /// `every = 0` disables progress lines.
    #[must_use]
    pub fn new(label: &'a str, every: usize) -> Self {
        Self {
            label,
            every,
            seen: 0,
        }
    }

    /// Counts one record; returns `true` when a progress line was emitted.
    pub fn tick(&mut self) -> bool {
        self.seen += 1;
        if self.every == 0 || !self.seen.is_multiple_of(self.every) {
            return false;
        }
        tracing::info!(batch = self.label, processed = self.seen, "batch progress");
        true
    }

    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocery_core::RecordKind;
    use grocery_ingest::{Rejection, ValidationError};

    fn submitted() -> Outcome {
        Outcome::Submitted(Submission {
            kind: RecordKind::Product,
            attempts: 1,
            status: 201,
            action: Some("created".to_owned()),
        })
    }

    fn rejected() -> Outcome {
        Outcome::Failed(DeliveryError::Rejected {
            status: 400,
            url: "http://localhost:3002/api/product".to_owned(),
            body: String::new(),
        })
    }

    fn exhausted() -> Outcome {
        Outcome::Failed(DeliveryError::ServerError {
            status: 503,
            url: "http://localhost:3002/api/product".to_owned(),
            body: String::new(),
        })
    }

    #[test]
    fn folds_outcomes_into_counts() {
        let outcomes = [
            submitted(),
            submitted(),
            Outcome::Skipped(IngestError::Rejected(Rejection::Unclassified)),
            Outcome::Skipped(IngestError::Invalid(ValidationError::MissingName)),
            rejected(),
            exhausted(),
        ];
        let report: BatchReport = outcomes.iter().collect();
        assert_eq!(
            report,
            BatchReport {
                total: 6,
                submitted: 2,
                skipped: 2,
                failed: 2,
                failed_permanent: 1,
            }
        );
        assert_eq!(report.failed_transient(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn counts_always_add_up() {
        let outcomes = [submitted(), rejected(), exhausted(), submitted()];
        let report: BatchReport = outcomes.iter().collect();
        assert_eq!(report.submitted + report.skipped + report.failed, report.total);
    }

    #[test]
    fn empty_batch_is_clean() {
        let report = BatchReport::default();
        assert!(report.is_clean());
        assert_eq!(
            report.to_string(),
            "0 records: 0 submitted, 0 skipped, 0 failed (0 rejected)"
        );
    }

    #[test]
    fn merge_sums_batches() {
        let mut totals: BatchReport = [submitted(), rejected()].iter().collect();
        let second: BatchReport = [exhausted(), submitted(), submitted()].iter().collect();
        totals.merge(&second);
        assert_eq!(totals.total, 5);
        assert_eq!(totals.submitted, 3);
        assert_eq!(totals.failed, 2);
        assert_eq!(totals.failed_permanent, 1);
    }

    #[test]
    fn permanent_failure_flag() {
        assert!(rejected().is_permanent_failure());
        assert!(!exhausted().is_permanent_failure());
        assert!(!submitted().is_permanent_failure());
    }

    #[test]
    fn progress_fires_every_n_records() {
        let mut progress = Progress::new("products.json", 3);
        let fired: Vec<bool> = (0..7).map(|_| progress.tick()).collect();
        assert_eq!(fired, [false, false, true, false, false, true, false]);
        assert_eq!(progress.seen(), 7);
    }

    #[test]
    fn progress_disabled_with_zero() {
        let mut progress = Progress::new("stores.json", 0);
        assert!((0..5).all(|_| !progress.tick()));
    }
}

//! `send` command: one batch per input file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::ValueEnum;
use grocery_core::{AppConfig, RecordKind};
use grocery_delivery::{run_batch, BatchReport, DeliveryClient};
use serde_json::Value;

/// Record shape for a whole input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Classify each record by its keys
    Auto,
    /// Treat every record as a product
    Product,
    /// Treat every record as a store
    Store,
}

impl KindArg {
    #[must_use]
    pub fn record_kind(self) -> Option<RecordKind> {
        match self {
            KindArg::Auto => None,
            KindArg::Product => Some(RecordKind::Product),
            KindArg::Store => Some(RecordKind::Store),
        }
    }
}

/// Waits for the receiver, then delivers every file in order.
///
/// Unreadable files are logged and skipped so one bad file does not hold up
/// the rest; the command still fails at the end if any were skipped.
pub(crate) async fn run_send(
    client: &DeliveryClient,
    config: &AppConfig,
    files: &[PathBuf],
    kind: KindArg,
    skip_health_check: bool,
) -> anyhow::Result<()> {
    if skip_health_check {
        tracing::warn!("health check skipped");
    } else {
        client
            .wait_for_service()
            .await
            .context("receiving service unavailable; no batch attempted")?;
    }

    let mut totals = BatchReport::default();
    let mut unreadable = 0usize;

    for file in files {
        let label = file.display().to_string();
        let records = match read_records(file) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    file = %label,
                    error = format!("{e:#}"),
                    "skipping unreadable batch file"
                );
                unreadable += 1;
                continue;
            }
        };

        let report = run_batch(
            client,
            &label,
            records,
            kind.record_kind(),
            config.progress_every,
        )
        .await;
        println!("{label}: {report}");
        totals.merge(&report);
    }

    if files.len() > 1 {
        println!("total: {totals}");
    }
    if unreadable > 0 {
        bail!("{unreadable} of {} batch files could not be read", files.len());
    }
    Ok(())
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_records(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// A batch file is a JSON array of records; a lone object is a batch of one.
fn parse_records(text: &str) -> anyhow::Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        other => bail!(
            "expected a JSON array or object at top level, found {}",
            json_type(&other)
        ),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

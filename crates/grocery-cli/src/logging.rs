use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use grocery_delivery::REJECT_LOG_TARGET;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Installs the global subscriber.
///
/// Everything goes to stderr, filtered by `RUST_LOG` or else `log_level`.
/// Skipped records and failed deliveries are also appended, without ANSI
/// colour codes, to `error_log` for manual reprocessing.
pub(crate) fn init_tracing(log_level: &str, error_log: &Path) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log)
        .with_context(|| format!("failed to open error log {}", error_log.display()))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(reject_layer(Mutex::new(file)))
        .try_init()?;
    Ok(())
}

/// Plain-text layer that keeps only warn-and-above events on
/// [`REJECT_LOG_TARGET`].
fn reject_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(Targets::new().with_target(REJECT_LOG_TARGET, Level::WARN))
}

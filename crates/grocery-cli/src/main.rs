mod logging;
mod send;
mod stores;

use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use grocery_core::DeliveryConfig;
use grocery_delivery::DeliveryClient;

use crate::send::KindArg;

#[derive(Debug, Parser)]
#[command(name = "grocery-feed")]
#[command(about = "Normalize scraped grocery data and deliver it to the product receiver")]
struct Cli {
    /// Receiver base URL (overrides PRODUCT_RECEIVER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Retries after the first attempt on 5xx or network errors
    #[arg(long, global = true)]
    max_retries: Option<u32>,
    /// Backoff base in seconds; retry n sleeps factor^n
    #[arg(long, global = true)]
    backoff_factor: Option<f64>,
    /// Ceiling on concurrent HTTP requests
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize, validate and submit scraped JSON files, one batch per file
    Send {
        /// JSON files holding an array of scraped records
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Record shape; `auto` classifies each record by its keys
        #[arg(long, value_enum, default_value_t = KindArg::Auto)]
        kind: KindArg,
        /// Submit without waiting for the health endpoint first
        #[arg(long)]
        skip_health_check: bool,
    },
    /// Probe the receiver's health endpoint once
    Health,
    /// List stores known to the receiver
    Stores {
        /// Chain name, e.g. Tigre (requires --city)
        #[arg(long, requires = "city")]
        grocery: Option<String>,
        /// City name (requires --grocery)
        #[arg(long, requires = "grocery")]
        city: Option<String>,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the environment config.
    fn apply_overrides(&self, delivery: &mut DeliveryConfig) -> anyhow::Result<()> {
        if let Some(base_url) = &self.base_url {
            ensure!(!base_url.trim().is_empty(), "--base-url must not be empty");
            delivery.base_url.clone_from(base_url);
        }
        if let Some(max_retries) = self.max_retries {
            delivery.max_retries = max_retries;
        }
        if let Some(factor) = self.backoff_factor {
            ensure!(
                factor.is_finite() && factor >= 0.0,
                "--backoff-factor must be a finite number >= 0, got {factor}"
            );
            delivery.backoff_factor = factor;
        }
        if let Some(max_concurrent) = self.max_concurrent {
            ensure!(max_concurrent >= 1, "--max-concurrent must be at least 1");
            delivery.max_concurrent_requests = max_concurrent;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = grocery_core::load_app_config().context("invalid configuration")?;
    cli.apply_overrides(&mut config.delivery)?;
    logging::init_tracing(&config.log_level, &config.error_log_path)?;

    let client = DeliveryClient::new(&config.delivery)?;
    tracing::debug!(
        base_url = %config.delivery.base_url,
        max_retries = config.delivery.max_retries,
        backoff_factor = config.delivery.backoff_factor,
        max_concurrent = config.delivery.max_concurrent_requests,
        "delivery client ready"
    );

    match &cli.command {
        Commands::Send {
            files,
            kind,
            skip_health_check,
        } => send::run_send(&client, &config, files, *kind, *skip_health_check).await?,
        Commands::Health => {
            client.health_check().await.context("health check failed")?;
            println!("receiver at {} is healthy", config.delivery.base_url);
        }
        Commands::Stores { grocery, city } => {
            stores::run_stores(&client, grocery.as_deref(), city.as_deref()).await?;
        }
    }

    Ok(())
}

//! libris-backfill - ISBN backfill service
//!
//! Walks the catalog listing, derives missing ISBN forms from their valid
//! siblings, pushes corrections back to the catalog, and appends each
//! confirmed correction to the CSV ledger.

use anyhow::{Context, Result};
use libris_backfill::pipeline::Orchestrator;
use libris_backfill::services::catalog_client::CatalogClient;
use libris_backfill::services::csv_sink::CsvSink;
use libris_backfill::BackfillConfig;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting libris-backfill");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path =
        std::env::var("LIBRIS_CONFIG").unwrap_or_else(|_| "libris.toml".to_string());
    let config = BackfillConfig::resolve(Some(Path::new(&config_path)))
        .context("failed to resolve configuration")?;

    info!(
        api_base_url = %config.api_base_url,
        output = %config.output_path.display(),
        "Configuration resolved"
    );

    let client =
        CatalogClient::new(&config.api_base_url).context("failed to build catalog client")?;
    let sink = CsvSink::create(&config.output_path).context("failed to create the ledger file")?;

    let summary = Orchestrator::new(config, client, sink).run().await?;

    info!(
        books = summary.books_fetched,
        derived = summary.corrections_derived,
        applied = summary.updates_applied,
        failed = summary.updates_failed,
        rows = summary.rows_written,
        "Backfill finished"
    );

    Ok(())
}

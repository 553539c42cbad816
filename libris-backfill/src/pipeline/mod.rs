//! Backfill pipeline
//!
//! Channel-wired stages running concurrently for the duration of a run:
//!
//! ```text
//! fetch ──> convert (N workers) ──> update (M workers) ──> record ──> confirmations
//! ```
//!
//! Completion propagates downstream by channel closure: fetch closes the
//! book channel when the catalog is exhausted, each pool closes its output
//! once every worker has drained the shared input, and the confirmation
//! stream closes when the record stage finishes. Strict ordering exists
//! only within fetch; the fan-out pools may reorder freely.

pub mod convert;
pub mod fetch;
pub mod record;
pub mod update;

use crate::config::BackfillConfig;
use crate::services::catalog_client::CatalogClient;
use crate::services::csv_sink::CsvSink;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

/// Receiver end of a fan-out channel, shared by every worker in a pool.
pub type SharedReceiver<T> = Arc<Mutex<mpsc::Receiver<T>>>;

/// Take the next item off a shared receiver, or `None` once the channel is
/// closed and drained. The lock is held only while dequeueing, so sibling
/// workers process their items in parallel.
pub(crate) async fn next_item<T>(rx: &SharedReceiver<T>) -> Option<T> {
    rx.lock().await.recv().await
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackfillSummary {
    /// Records emitted by the fetch stage.
    pub books_fetched: usize,
    /// Identifiers derived by the convert pool.
    pub corrections_derived: usize,
    /// Catalog updates confirmed with HTTP 200.
    pub updates_applied: usize,
    /// Catalog updates rejected or failed in transport.
    pub updates_failed: usize,
    /// Rows appended to the ledger.
    pub rows_written: usize,
}

/// Wires the stages together and drives one backfill run to completion.
pub struct Orchestrator {
    config: BackfillConfig,
    client: CatalogClient,
    sink: CsvSink,
}

impl Orchestrator {
    pub fn new(config: BackfillConfig, client: CatalogClient, sink: CsvSink) -> Self {
        Self {
            config,
            client,
            sink,
        }
    }

    /// Run the pipeline until every stage has drained, then flush the
    /// ledger. A flush failure is the run's terminal error; everything
    /// upstream degrades to a truncated or partial run instead.
    pub async fn run(self) -> Result<BackfillSummary> {
        let capacity = self.config.channel_capacity;
        let (book_tx, book_rx) = mpsc::channel(capacity);
        let (isbn_tx, isbn_rx) = mpsc::channel(capacity);
        let (updated_tx, updated_rx) = mpsc::channel(capacity);
        let (confirm_tx, mut confirm_rx) = mpsc::channel(capacity);

        let book_rx: SharedReceiver<_> = Arc::new(Mutex::new(book_rx));
        let isbn_rx: SharedReceiver<_> = Arc::new(Mutex::new(isbn_rx));

        info!(
            converters = self.config.converters,
            updaters = self.config.updaters,
            "Starting backfill pipeline"
        );

        let fetch_handle = tokio::spawn(fetch::run(
            self.client.clone(),
            self.config.max_pages,
            book_tx,
        ));

        let mut convert_handles = Vec::with_capacity(self.config.converters);
        for worker in 0..self.config.converters {
            convert_handles.push(tokio::spawn(convert::worker(
                worker,
                Arc::clone(&book_rx),
                isbn_tx.clone(),
            )));
        }
        drop(isbn_tx);

        let mut update_handles = Vec::with_capacity(self.config.updaters);
        for worker in 0..self.config.updaters {
            update_handles.push(tokio::spawn(update::worker(
                worker,
                self.client.clone(),
                self.config.retry.clone(),
                Arc::clone(&isbn_rx),
                updated_tx.clone(),
            )));
        }
        drop(updated_tx);

        let record_handle = tokio::spawn(record::run(self.sink.clone(), updated_rx, confirm_tx));

        // Block draining confirmations; the stream closes only after every
        // upstream stage has finished and the record task returned.
        while confirm_rx.recv().await.is_some() {}

        let books_fetched = fetch_handle.await.context("fetch stage panicked")?;

        let mut corrections_derived = 0;
        for handle in convert_handles {
            corrections_derived += handle.await.context("convert worker panicked")?;
        }

        let (mut updates_applied, mut updates_failed) = (0, 0);
        for handle in update_handles {
            let outcome = handle.await.context("update worker panicked")?;
            updates_applied += outcome.applied;
            updates_failed += outcome.failed;
        }

        let rows_written = record_handle.await.context("record stage panicked")?;

        let summary = BackfillSummary {
            books_fetched,
            corrections_derived,
            updates_applied,
            updates_failed,
            rows_written,
        };

        self.sink
            .flush()
            .await
            .context("failed to flush the ledger")?;

        info!(
            books = summary.books_fetched,
            derived = summary.corrections_derived,
            applied = summary.updates_applied,
            failed = summary.updates_failed,
            rows = summary.rows_written,
            "Backfill run complete"
        );

        Ok(summary)
    }
}

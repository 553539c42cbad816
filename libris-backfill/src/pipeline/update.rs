//! Update stage
//!
//! Fan-out workers that push derived identifiers back to the catalog. A
//! failed update is isolated to its item: it is logged and counted, the
//! worker moves on, and the identifier is withheld from the ledger.

use super::{next_item, SharedReceiver};
use crate::config::RetryPolicy;
use crate::services::catalog_client::{CatalogClient, CatalogError};
use libris_common::Isbn;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Per-worker outcome counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateOutcome {
    pub applied: usize,
    pub failed: usize,
}

/// Single worker loop over the shared identifier receiver. Confirmed
/// updates are forwarded to the record stage; failures are only counted.
pub async fn worker(
    worker: usize,
    client: CatalogClient,
    retry: RetryPolicy,
    rx: SharedReceiver<Isbn>,
    tx: mpsc::Sender<Isbn>,
) -> UpdateOutcome {
    let mut outcome = UpdateOutcome::default();

    while let Some(isbn) = next_item(&rx).await {
        match push_with_retry(&client, &retry, &isbn).await {
            Ok(()) => {
                debug!(worker = worker, isbn13 = %isbn.isbn13, "Catalog update applied");
                outcome.applied += 1;
                if tx.send(isbn).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(
                    worker = worker,
                    isbn13 = %isbn.isbn13,
                    error = %e,
                    "Catalog update failed"
                );
                outcome.failed += 1;
            }
        }
    }

    outcome
}

async fn push_with_retry(
    client: &CatalogClient,
    retry: &RetryPolicy,
    isbn: &Isbn,
) -> Result<(), CatalogError> {
    let mut attempt = 1u32;

    loop {
        match client.update_book(isbn).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < retry.max_attempts => {
                debug!(
                    isbn13 = %isbn.isbn13,
                    attempt = attempt,
                    error = %e,
                    "Transient update failure; retrying"
                );
                tokio::time::sleep(retry.backoff()).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

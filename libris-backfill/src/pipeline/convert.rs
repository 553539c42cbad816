//! Convert stage
//!
//! Fan-out workers that decide whether a record needs a derived
//! identifier and compute it from the well-formed sibling form. Records
//! with both forms intact, or with nothing usable to derive from, are
//! dropped.

use super::{next_item, SharedReceiver};
use libris_common::models::Book;
use libris_common::Isbn;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Single worker loop over the shared book receiver. Returns the number
/// of corrections this worker derived.
pub async fn worker(worker: usize, rx: SharedReceiver<Book>, tx: mpsc::Sender<Isbn>) -> usize {
    let mut derived = 0usize;

    while let Some(book) = next_item(&rx).await {
        let isbn13 = book.isbn13.as_deref().unwrap_or("");
        let isbn10 = book.isbn10.as_deref().unwrap_or("");

        let candidate = if isbn13.len() != 13 && !isbn10.is_empty() {
            isbn10
        } else if isbn10.len() != 10 && !isbn13.is_empty() {
            isbn13
        } else {
            // Both forms already well-formed, or nothing to derive from.
            continue;
        };

        let isbn = match Isbn::parse(candidate) {
            Ok(isbn) => isbn,
            Err(e) => {
                warn!(
                    worker = worker,
                    title = %book.title,
                    error = %e,
                    "Dropping record with unusable identifier"
                );
                continue;
            }
        };

        debug!(
            worker = worker,
            isbn13 = %isbn.isbn13,
            isbn10 = %isbn.isbn10,
            "Derived missing identifier"
        );

        if tx.send(isbn).await.is_err() {
            break;
        }
        derived += 1;
    }

    derived
}

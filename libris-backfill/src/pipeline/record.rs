//! Record stage
//!
//! Single consumer appending confirmed corrections to the CSV ledger. The
//! recorded column is the form the catalog originally held: isbn13 for a
//! record that arrived with a valid ISBN-13, isbn10 otherwise.

use crate::services::csv_sink::CsvSink;
use libris_common::Isbn;
use tokio::sync::mpsc;
use tracing::error;

/// Drain the updated-identifier channel into the sink, confirming each
/// written row. Returns the number of rows appended. Row failures are
/// logged and skipped; sink health is surfaced by the terminal flush.
pub async fn run(sink: CsvSink, mut rx: mpsc::Receiver<Isbn>, confirm_tx: mpsc::Sender<()>) -> usize {
    let mut written = 0usize;

    while let Some(isbn) = rx.recv().await {
        if let Err(e) = sink.append(isbn.source_value()).await {
            error!(isbn13 = %isbn.isbn13, error = %e, "Failed to append ledger row");
            continue;
        }
        written += 1;

        if confirm_tx.send(()).await.is_err() {
            break;
        }
    }

    written
}

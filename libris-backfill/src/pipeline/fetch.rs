//! Fetch stage
//!
//! Walks the paginated catalog listing strictly in increasing page order,
//! one request in flight, and emits each page's records in order. A
//! transport or decode failure truncates the stream: the error is logged,
//! the output closes, and downstream stages drain what was already
//! emitted.

use crate::services::catalog_client::CatalogClient;
use libris_common::models::Book;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Run until the catalog reports no next page, a failure truncates the
/// stream, or the page bound is hit. Returns the number of records
/// emitted. The output channel closes when this returns.
pub async fn run(client: CatalogClient, max_pages: u32, tx: mpsc::Sender<Book>) -> usize {
    let mut emitted = 0usize;
    let mut page = 1u32;
    let mut pages_walked = 0u32;

    loop {
        if pages_walked >= max_pages {
            warn!(
                max_pages = max_pages,
                "Page bound reached before catalog end; truncating fetch"
            );
            break;
        }

        let listing = match client.list_books(page).await {
            Ok(listing) => listing,
            Err(e) => {
                error!(page = page, error = %e, "Catalog fetch failed; truncating stream");
                break;
            }
        };
        pages_walked += 1;

        debug!(
            page = page,
            items = listing.items.len(),
            next_page = listing.next_page,
            "Fetched catalog page"
        );

        for book in listing.items {
            if tx.send(book).await.is_err() {
                // Every receiver is gone; nothing left to feed.
                return emitted;
            }
            emitted += 1;
        }

        if listing.next_page == 0 {
            break;
        }
        if listing.next_page <= page {
            warn!(
                page = page,
                next_page = listing.next_page,
                "Catalog reported a non-advancing next page; terminating fetch"
            );
            break;
        }
        page = listing.next_page;
    }

    emitted
}

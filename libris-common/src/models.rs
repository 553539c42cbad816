//! Catalog data models
//!
//! Wire types served by the catalog listing endpoint. Field names follow
//! the catalog's JSON format (`publication_year`, `image_url`, ...).

use serde::{Deserialize, Serialize};

/// A catalog book record as served by the listing endpoint.
///
/// Either identifier may be missing; the listing reports a missing form as
/// an empty string or omits the field entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub isbn13: Option<String>,
    #[serde(default)]
    pub isbn10: Option<String>,
    pub price: f64,
    pub publication_year: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    pub authors: Vec<String>,
    pub publisher: String,
}

/// One page of a paginated listing.
///
/// `next_page == 0` signals the last page; an omitted field decodes as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedList<T> {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: u32,
    #[serde(default)]
    pub prev_page: u32,
    #[serde(default)]
    pub total_items: u32,
    pub items: Vec<T>,
}

pub type PaginatedBooks = PaginatedList<Book>;

impl<T> PaginatedList<T> {
    /// Build a page with the derived pagination fields filled in.
    pub fn new(current_page: u32, per_page: u32, total_items: u32, items: Vec<T>) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };

        let next_page = if current_page + 1 <= total_pages {
            current_page + 1
        } else {
            0
        };

        let prev_page = if current_page >= 2 { current_page - 1 } else { 0 };

        Self {
            current_page,
            per_page,
            total_pages,
            next_page,
            prev_page,
            total_items,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(current_page: u32, per_page: u32, total_items: u32) -> PaginatedList<u32> {
        PaginatedList::new(current_page, per_page, total_items, Vec::new())
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(page_of(1, 5, 23).total_pages, 5);
        assert_eq!(page_of(1, 5, 25).total_pages, 5);
        assert_eq!(page_of(1, 5, 0).total_pages, 0);
        assert_eq!(page_of(1, 0, 23).total_pages, 0);
    }

    #[test]
    fn test_next_page_is_zero_on_last_page() {
        assert_eq!(page_of(1, 5, 23).next_page, 2);
        assert_eq!(page_of(4, 5, 23).next_page, 5);
        assert_eq!(page_of(5, 5, 23).next_page, 0);
    }

    #[test]
    fn test_prev_page_is_zero_on_first_page() {
        assert_eq!(page_of(1, 5, 23).prev_page, 0);
        assert_eq!(page_of(3, 5, 23).prev_page, 2);
    }

    #[test]
    fn test_book_decodes_with_missing_identifiers() {
        let json = r#"{
            "title": "The Left Hand of Darkness",
            "isbn13": "",
            "price": 18.99,
            "publication_year": 1969,
            "authors": ["Ursula K. Le Guin"],
            "publisher": "Ace Books"
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.isbn13.as_deref(), Some(""));
        assert_eq!(book.isbn10, None);
        assert_eq!(book.edition, None);
    }

    #[test]
    fn test_listing_decodes_without_next_page() {
        let json = r#"{"items": []}"#;
        let listing: PaginatedBooks = serde_json::from_str(json).unwrap();
        assert_eq!(listing.next_page, 0);
        assert!(listing.items.is_empty());
    }
}

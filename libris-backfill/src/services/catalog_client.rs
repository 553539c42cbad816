//! Catalog API client
//!
//! HTTP collaborator for the book catalog: the paginated listing endpoint
//! and the per-record identifier update endpoint.

use libris_common::models::PaginatedBooks;
use libris_common::Isbn;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("libris-backfill/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Catalog returned status {0}: {1}")]
    Status(u16, String),
}

impl CatalogError {
    /// Transient failures are eligible for retry under the configured
    /// policy; rejections and malformed payloads are final.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Network(_) => true,
            CatalogError::Status(code, _) => *code >= 500,
            CatalogError::Decode(_) => false,
        }
    }
}

/// Book catalog API client
#[derive(Clone)]
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of the book listing.
    pub async fn list_books(&self, page: u32) -> Result<PaginatedBooks, CatalogError> {
        let url = format!("{}/books?page={}", self.base_url, page);
        tracing::debug!(page = page, url = %url, "Fetching catalog page");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    /// Push a corrected identifier pair to the record's canonical path.
    ///
    /// Success is exactly HTTP 200; any other status is a rejection.
    pub async fn update_book(&self, isbn: &Isbn) -> Result<(), CatalogError> {
        let url = format!("{}/books/{}", self.base_url, isbn.isbn13);
        tracing::debug!(isbn13 = %isbn.isbn13, "Updating catalog record");

        let response = self
            .http_client
            .put(&url)
            .json(isbn)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status(status.as_u16(), body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::new("http://127.0.0.1:8080/api/v1");
        assert!(client.is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CatalogClient::new("http://127.0.0.1:8080/api/v1/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8080/api/v1");
    }

    #[test]
    fn test_transient_classification() {
        assert!(CatalogError::Network("timed out".to_string()).is_transient());
        assert!(CatalogError::Status(503, String::new()).is_transient());
        assert!(!CatalogError::Status(404, String::new()).is_transient());
        assert!(!CatalogError::Status(422, String::new()).is_transient());
        assert!(!CatalogError::Decode("bad json".to_string()).is_transient());
    }
}

//! Collaborator services for the backfill pipeline

pub mod catalog_client;
pub mod csv_sink;

pub use catalog_client::{CatalogClient, CatalogError};
pub use csv_sink::{CsvSink, SinkError};

//! # Libris Backfill Service
//!
//! Scans the book catalog for records missing one of their two ISBN forms,
//! derives the missing identifier from the valid sibling via the check
//! digit algorithms, pushes the correction back to the catalog, and
//! appends each confirmed correction to a CSV ledger.
//!
//! All stages run concurrently: one fetch task walks the paginated
//! listing, fan-out worker pools convert and update records, and a single
//! record task owns the ledger writes. See [`pipeline`] for the wiring.

pub mod config;
pub mod pipeline;
pub mod services;

pub use config::{BackfillConfig, RetryPolicy};
pub use pipeline::{BackfillSummary, Orchestrator};

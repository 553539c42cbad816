//! Shared CSV sink
//!
//! Append-only, single-column ledger of corrected identifiers. All writers
//! funnel through one mutex-guarded `csv::Writer`, so concurrent producers
//! never interleave partial rows.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Mutex-guarded append-only CSV writer shared by all producers.
///
/// Cloning is cheap; clones share the same underlying writer and lock.
#[derive(Clone)]
pub struct CsvSink {
    writer: Arc<Mutex<csv::Writer<File>>>,
}

impl CsvSink {
    /// Create the output file, truncating any existing content.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Arc::new(Mutex::new(csv::Writer::from_writer(file))),
        })
    }

    /// Append one single-column row.
    pub async fn append(&self, value: &str) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().await;
        writer.write_record([value])?;
        Ok(())
    }

    /// Flush buffered rows to the underlying file.
    pub async fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().await;
        writer.flush()?;
        Ok(())
    }
}

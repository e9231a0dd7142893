//! Local CSV file backend

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{HEADER, LeadRecord, LeadSink, SinkError};
use crate::Result;

/// Appends leads to a CSV file, writing the header when the file is first created
///
/// Appends are not coordinated across requests: two submissions racing on a
/// missing file may both write a header.
#[derive(Debug, Clone)]
pub struct CsvLeadSink {
    path: PathBuf,
}

impl CsvLeadSink {
    /// Create a sink for the given file path; nothing is touched until the first append
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_blocking(path: &Path, row: &[String]) -> Result<()> {
        if !path.exists() {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl LeadSink for CsvLeadSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn append(&self, record: &LeadRecord) -> std::result::Result<(), SinkError> {
        let path = self.path.clone();
        let row = record.to_row();

        tokio::task::spawn_blocking(move || Self::append_blocking(&path, &row))
            .await
            .map_err(|e| SinkError::Local(format!("append task failed: {e}")))?
            .map_err(|e| SinkError::Local(e.to_string()))
    }
}

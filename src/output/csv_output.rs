//! CSV record sink

use crate::output::traits::{BookRecord, RecordSink};
use crate::CrawlError;
use std::path::{Path, PathBuf};

/// Writes records to a CSV file with header `title,price,stock_qty,url`
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink for `path`, creating its parent directory now
    ///
    /// Creating the directory up front makes an unwritable destination fail
    /// before any crawling happens.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - The directory exists and the sink is ready
    /// * `Err(CrawlError::OutputDir)` - The directory could not be created
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, CrawlError> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn write_records(&mut self, records: &[BookRecord]) -> crate::Result<()> {
        ensure_parent_dir(&self.path)?;

        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!(
            path = %self.path.display(),
            rows = records.len(),
            "CSV file written"
        );
        Ok(())
    }
}

/// Creates the parent directory of `path` if it has one
pub fn ensure_parent_dir(path: &Path) -> Result<(), CrawlError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|source| CrawlError::OutputDir {
                path: parent.to_path_buf(),
                source,
            }),
        _ => Ok(()),
    }
}

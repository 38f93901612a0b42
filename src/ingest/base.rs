use crate::errors::Result;
use crate::models::table::RawCsvTable;
use log::debug;
use std::path::Path;

/// Base trait for tabular file ingestion
pub trait TableIngestor {
    /// Name of the format this ingestor reads
    fn format_name(&self) -> &'static str;

    /// Parse an in-memory file into a raw table
    fn ingest_bytes(&self, bytes: &[u8]) -> Result<RawCsvTable>;

    /// Read and parse a file from disk
    fn ingest_path(&self, path: &Path) -> Result<RawCsvTable> {
        debug!("读取{}文件 {}", self.format_name(), path.display());
        let bytes = std::fs::read(path)?;
        self.ingest_bytes(&bytes)
    }
}

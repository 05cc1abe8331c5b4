//! Columnar writers for reduced tables

mod feather;
mod parquet;

use std::path::Path;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::Table;

pub use self::feather::FeatherWriter;
pub use self::parquet::ParquetWriter;

/// Trait for persisting a table
pub trait TableWriter {
    /// Write `table` to `path`, replacing any existing file
    fn write(&self, table: &Table, path: &Path) -> Result<()>;
}

/// Factory for creating writers
pub struct WriterFactory;

impl WriterFactory {
    /// Create a writer based on format type
    pub fn create(format: OutputFormat) -> Box<dyn TableWriter> {
        match format {
            OutputFormat::Feather => Box::new(FeatherWriter),
            OutputFormat::Parquet => Box::new(ParquetWriter),
        }
    }
}

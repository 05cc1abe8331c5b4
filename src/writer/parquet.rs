//! Parquet writer

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use tracing::debug;

use crate::columnar::table_to_record_batch;
use crate::model::Table;

use super::TableWriter;

/// Writes tables as Parquet files with the Arrow schema embedded
pub struct ParquetWriter;

impl TableWriter for ParquetWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        let batch = table_to_record_batch(table).context("Failed to build Arrow batch")?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create Parquet file: {}", path.display()))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
            .context("Failed to create Parquet writer")?;
        writer.write(&batch).context("Failed to write Parquet batch")?;
        writer.close().context("Failed to finish Parquet file")?;

        debug!(path = %path.display(), rows = batch.num_rows(), "wrote parquet file");
        Ok(())
    }
}

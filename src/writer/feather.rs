//! Feather v2 (Arrow IPC file) writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::ipc::writer::FileWriter;
use tracing::debug;

use crate::columnar::table_to_record_batch;
use crate::model::Table;

use super::TableWriter;

/// Writes tables as uncompressed Feather v2 files
pub struct FeatherWriter;

impl TableWriter for FeatherWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        let batch = table_to_record_batch(table).context("Failed to build Arrow batch")?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create Feather file: {}", path.display()))?;
        let mut writer = FileWriter::try_new(BufWriter::new(file), batch.schema().as_ref())
            .context("Failed to create Feather writer")?;
        writer.write(&batch).context("Failed to write Feather batch")?;
        writer.finish().context("Failed to finish Feather file")?;
        writer
            .into_inner()
            .context("Failed to finish Feather file")?
            .flush()
            .with_context(|| format!("Failed to flush Feather file: {}", path.display()))?;

        debug!(path = %path.display(), rows = batch.num_rows(), "wrote feather file");
        Ok(())
    }
}

//! Feather v2 (Arrow IPC file) reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatch;

use crate::columnar::record_batch_to_table;
use crate::config::Config;
use crate::model::Table;

use super::Parser;

/// Parser for Feather files
pub struct FeatherParser;

impl Parser for FeatherParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open Feather file: {}", path.display()))?;

        let reader = FileReader::try_new(BufReader::new(file), None)
            .context("Failed to create Feather reader")?;
        let schema = reader.schema();

        let batches = reader
            .collect::<Result<Vec<RecordBatch>, _>>()
            .context("Failed to read Feather batch")?;

        let batch = match batches.as_slice() {
            [single] => single.clone(),
            _ => concat_batches(&schema, &batches).context("Failed to combine Feather batches")?,
        };

        Ok(record_batch_to_table(&batch)?)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "feather" | "arrow" | "ipc")
    }
}

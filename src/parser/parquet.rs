//! Parquet file reader

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::columnar::record_batch_to_table;
use crate::config::Config;
use crate::model::Table;

use super::Parser;

/// Parser for Parquet files
pub struct ParquetParser;

impl Parser for ParquetParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open Parquet file: {}", path.display()))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .context("Failed to create Parquet reader")?;

        let schema = builder.schema().clone();
        let reader = builder.build().context("Failed to build Parquet reader")?;

        let batches = reader
            .collect::<Result<Vec<RecordBatch>, _>>()
            .context("Failed to read Parquet batch")?;

        let batch = match batches.as_slice() {
            [single] => single.clone(),
            _ => concat_batches(&schema, &batches).context("Failed to combine Parquet batches")?,
        };

        Ok(record_batch_to_table(&batch)?)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "parquet" | "pq")
    }
}

//! shrinkframe - Shrink tabular data before storing it as Feather
//!
//! Reads CSV (or an existing Feather/Parquet file), narrows every numeric
//! column to the smallest type that holds its values, turns text into
//! categoricals, and writes the result as a columnar file.

pub mod coerce;
pub mod columnar;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod reduce;
pub mod writer;

pub use config::{Config, ImportJob, OutputFormat, ReportFormat};
pub use error::ShrinkError;
pub use model::{Column, ColumnData, DType, Table};
pub use pipeline::{import_data, run, ImportOutcome};
pub use reduce::{reduce_mem_usage, MemoryReport, ReduceOptions};

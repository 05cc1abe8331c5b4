//! Import pipeline: read, coerce datetimes, reduce, write and read back

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coerce::coerce_datetime_columns;
use crate::config::{Config, ImportJob};
use crate::error::ShrinkError;
use crate::model::Table;
use crate::output::{ReportFactory, ReportFormatter};
use crate::parser::{parser_for_format, ParserFactory};
use crate::reduce::{reduce_mem_usage, MemoryReport};
use crate::writer::WriterFactory;

/// A requested datetime column that was left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedColumn {
    pub column: String,
    pub reason: String,
}

/// A table after import, before it is written
#[derive(Debug)]
pub struct Imported {
    pub table: Table,
    pub failed_datetime_columns: Vec<FailedColumn>,
    pub memory: MemoryReport,
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub failed_datetime_columns: Vec<FailedColumn>,
    pub memory: MemoryReport,
}

/// Read a file and shrink its memory footprint.
///
/// Datetime coercion failures are collected in the result; read errors are
/// returned.
pub fn import_data(path: &Path, datetime_columns: &[String], config: &Config) -> Result<Imported> {
    let mut table = ParserFactory::new()
        .parse(path, config)
        .with_context(|| format!("Failed to parse file: {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );

    let failed_datetime_columns = coerce_datetime_columns(&mut table, datetime_columns)
        .into_iter()
        .map(|failure| FailedColumn {
            column: failure.column,
            reason: failure.error.to_string(),
        })
        .collect();

    let memory = reduce_mem_usage(&mut table, &config.reduce_options());
    info!(
        path = %path.display(),
        before_bytes = memory.before_bytes,
        after_bytes = memory.after_bytes,
        "reduced memory usage"
    );

    Ok(Imported {
        table,
        failed_datetime_columns,
        memory,
    })
}

/// Check that a reloaded table matches the one that was written
pub fn verify_roundtrip(expected: &Table, actual: &Table) -> Result<(), ShrinkError> {
    let expected_names: Vec<&str> = expected.column_names().collect();
    let actual_names: Vec<&str> = actual.column_names().collect();
    if expected_names != actual_names {
        return Err(ShrinkError::RoundTrip(format!(
            "columns {:?} read back as {:?}",
            expected_names, actual_names
        )));
    }

    if expected.row_count() != actual.row_count() {
        return Err(ShrinkError::RoundTrip(format!(
            "{} rows read back as {}",
            expected.row_count(),
            actual.row_count()
        )));
    }

    for (want, got) in expected.columns().iter().zip(actual.columns()) {
        if want.dtype() != got.dtype() {
            return Err(ShrinkError::RoundTrip(format!(
                "column '{}' has dtype {} but read back as {}",
                want.name(),
                want.dtype(),
                got.dtype()
            )));
        }
        for row in 0..expected.row_count() {
            let (a, b) = (want.data().value(row), got.data().value(row));
            if a != b {
                return Err(ShrinkError::RoundTrip(format!(
                    "column '{}' row {}: wrote {} but read back {}",
                    want.name(),
                    row,
                    a,
                    b
                )));
            }
        }
    }

    Ok(())
}

/// Import one file, write its reduced copy and verify it reads back
pub fn process_job(
    job: &ImportJob,
    config: &Config,
    formatter: &dyn ReportFormatter,
    writer: &mut dyn Write,
) -> Result<ImportOutcome> {
    formatter.render_header(&job.input, writer)?;

    let imported = import_data(&job.input, &config.datetime_columns, config)?;

    WriterFactory::create(config.output_format)
        .write(&imported.table, &job.output)
        .with_context(|| format!("Failed to write file: {}", job.output.display()))?;

    let reloaded = parser_for_format(config.output_format)
        .parse(&job.output, config)
        .with_context(|| format!("Failed to read back file: {}", job.output.display()))?;
    verify_roundtrip(&imported.table, &reloaded)
        .with_context(|| format!("Verification failed for {}", job.output.display()))?;
    info!(path = %job.output.display(), "wrote and verified columnar file");

    let outcome = ImportOutcome {
        input: job.input.clone(),
        output: job.output.clone(),
        rows: imported.table.row_count(),
        columns: imported.table.column_count(),
        failed_datetime_columns: imported.failed_datetime_columns,
        memory: imported.memory,
    };
    formatter.render_outcome(&outcome, writer)?;
    Ok(outcome)
}

/// Process every configured job in order
pub fn run(config: &Config, writer: &mut dyn Write) -> Result<Vec<ImportOutcome>> {
    let formatter = ReportFactory::create(config.report_format, config.show_summary);
    config
        .jobs
        .iter()
        .map(|job| process_job(job, config, formatter.as_ref(), writer))
        .collect()
}

//! JSON console report

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::pipeline::{FailedColumn, ImportOutcome};
use crate::reduce::ColumnReport;

use super::ReportFormatter;

/// One JSON object per processed file
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    input: String,
    output: String,
    rows: usize,
    columns: usize,
    before_bytes: usize,
    after_bytes: usize,
    before_mb: f64,
    after_mb: f64,
    decrease_pct: f64,
    failed_datetime_columns: &'a [FailedColumn],
    column_reports: &'a [ColumnReport],
}

impl ReportFormatter for JsonReport {
    fn render_header(&self, _path: &Path, _writer: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn render_outcome(&self, outcome: &ImportOutcome, writer: &mut dyn Write) -> Result<()> {
        let memory = &outcome.memory;
        let json = JsonOutcome {
            input: outcome.input.display().to_string(),
            output: outcome.output.display().to_string(),
            rows: outcome.rows,
            columns: outcome.columns,
            before_bytes: memory.before_bytes,
            after_bytes: memory.after_bytes,
            before_mb: memory.before_mb(),
            after_mb: memory.after_mb(),
            decrease_pct: memory.decrease_pct(),
            failed_datetime_columns: &outcome.failed_datetime_columns,
            column_reports: &memory.columns,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &json)?;
        } else {
            serde_json::to_writer(&mut *writer, &json)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DType;
    use crate::reduce::MemoryReport;
    use std::path::PathBuf;

    fn outcome() -> ImportOutcome {
        ImportOutcome {
            input: PathBuf::from("test.csv"),
            output: PathBuf::from("test.feather"),
            rows: 2,
            columns: 1,
            failed_datetime_columns: Vec::new(),
            memory: MemoryReport {
                before_bytes: 16,
                after_bytes: 2,
                columns: vec![ColumnReport {
                    name: "meter".to_string(),
                    before: DType::Int64,
                    after: DType::Int8,
                    before_bytes: 16,
                    after_bytes: 2,
                }],
            },
        }
    }

    #[test]
    fn test_json_outcome() {
        let mut buf = Vec::new();
        JsonReport::new().render_outcome(&outcome(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["input"], "test.csv");
        assert_eq!(value["decrease_pct"], 87.5);
        assert_eq!(value["column_reports"][0]["after"], "int8");
    }

    #[test]
    fn test_pretty_json_and_no_header() {
        let report = JsonReport::pretty();
        let mut buf = Vec::new();
        report.render_header(Path::new("test.csv"), &mut buf).unwrap();
        assert!(buf.is_empty());

        report.render_outcome(&outcome(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().count() > 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rows"], 2);
    }
}

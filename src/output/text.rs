//! Plain-text console report

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::pipeline::ImportOutcome;

use super::{render_column_summary, ReportFormatter};

const SEPARATOR_WIDTH: usize = 50;

/// Line-oriented progress report
pub struct TextReport {
    show_summary: bool,
}

impl TextReport {
    pub fn new(show_summary: bool) -> Self {
        Self { show_summary }
    }
}

impl Default for TextReport {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReportFormatter for TextReport {
    fn render_header(&self, path: &Path, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        writeln!(writer, "Processing {}", path.display())?;
        Ok(())
    }

    fn render_outcome(&self, outcome: &ImportOutcome, writer: &mut dyn Write) -> Result<()> {
        for failed in &outcome.failed_datetime_columns {
            writeln!(
                writer,
                "{} is not present in {}",
                failed.column,
                outcome.input.display()
            )?;
        }

        let memory = &outcome.memory;
        writeln!(
            writer,
            "Memory usage of dataframe is {:.2} MB",
            memory.before_mb()
        )?;
        writeln!(
            writer,
            "Memory usage after optimization is {:.2} MB",
            memory.after_mb()
        )?;
        writeln!(writer, "Decreased by {:.1}%", memory.decrease_pct())?;

        if self.show_summary {
            writeln!(writer, "{}", render_column_summary(memory))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FailedColumn;
    use crate::reduce::MemoryReport;
    use std::path::PathBuf;

    fn outcome() -> ImportOutcome {
        ImportOutcome {
            input: PathBuf::from("train.csv"),
            output: PathBuf::from("train.feather"),
            rows: 10,
            columns: 2,
            failed_datetime_columns: vec![FailedColumn {
                column: "timestamp".to_string(),
                reason: "Column 'timestamp' not found in table".to_string(),
            }],
            memory: MemoryReport {
                before_bytes: 4 * 1024 * 1024,
                after_bytes: 1024 * 1024,
                columns: Vec::new(),
            },
        }
    }

    #[test]
    fn test_header_lines() {
        let mut buf = Vec::new();
        TextReport::default()
            .render_header(Path::new("train.csv"), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(50));
        assert_eq!(lines[1], "Processing train.csv");
    }

    #[test]
    fn test_outcome_lines() {
        let mut buf = Vec::new();
        TextReport::default()
            .render_outcome(&outcome(), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "timestamp is not present in train.csv\n\
             Memory usage of dataframe is 4.00 MB\n\
             Memory usage after optimization is 1.00 MB\n\
             Decreased by 75.0%\n"
        );
    }
}

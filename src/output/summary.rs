//! Per-column before/after table

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::reduce::MemoryReport;

/// Render one row per column with its old and new storage
pub fn render_column_summary(report: &MemoryReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        ["column", "before", "after", "before bytes", "after bytes"].map(String::from),
    );

    for column in &report.columns {
        builder.push_record([
            column.name.clone(),
            column.before.to_string(),
            column.after.to_string(),
            column.before_bytes.to_string(),
            column.after_bytes.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    format!(
        "{}\n{} of {} columns retyped",
        table,
        report.changed_columns().count(),
        report.columns.len()
    )
}

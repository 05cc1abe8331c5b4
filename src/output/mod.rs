//! Console reporting for import runs

mod json;
mod summary;
mod text;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::ReportFormat;
use crate::pipeline::ImportOutcome;

pub use json::JsonReport;
pub use summary::render_column_summary;
pub use text::TextReport;

/// Trait for report formatters
pub trait ReportFormatter {
    /// Called before a file is read
    fn render_header(&self, path: &Path, writer: &mut dyn Write) -> Result<()>;

    /// Called once the file has been reduced, written and verified
    fn render_outcome(&self, outcome: &ImportOutcome, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating report formatters
pub struct ReportFactory;

impl ReportFactory {
    /// Create a formatter based on format type
    pub fn create(format: ReportFormat, show_summary: bool) -> Box<dyn ReportFormatter> {
        match format {
            ReportFormat::Text => Box::new(TextReport::new(show_summary)),
            ReportFormat::Json => Box::new(JsonReport::new()),
            ReportFormat::JsonPretty => Box::new(JsonReport::pretty()),
        }
    }
}

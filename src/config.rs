//! Configuration handling for shrinkframe

use std::path::{Path, PathBuf};

use crate::reduce::ReduceOptions;

/// Columnar format written after reduction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Feather v2 (Arrow IPC file)
    #[default]
    Feather,
    Parquet,
}

impl OutputFormat {
    /// File extension used when no output path is given
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Feather => "feather",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feather" | "arrow" | "ipc" => Ok(OutputFormat::Feather),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Console report style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    /// Indented JSON, one multi-line object per file
    JsonPretty,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "json-pretty" => Ok(ReportFormat::JsonPretty),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// One source file and where its reduced copy goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ImportJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Write next to the input, swapping the extension for the format's.
    ///
    /// An input already carrying that extension gets a `.reduced` infix
    /// instead, so the source file is never overwritten.
    pub fn beside(input: impl Into<PathBuf>, format: OutputFormat) -> Self {
        let input = input.into();
        let ext = format.extension();
        let same_ext = input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        let output = if same_ext {
            input.with_extension(format!("reduced.{}", ext))
        } else {
            input.with_extension(ext)
        };
        Self { input, output }
    }
}

/// Configuration for an import run
#[derive(Debug, Clone)]
pub struct Config {
    /// Files to process, in order
    pub jobs: Vec<ImportJob>,
    /// Allow 16-bit floats as a narrowing target
    pub use_float16: bool,
    /// Columns to coerce to datetime after parsing
    pub datetime_columns: Vec<String>,
    /// Columnar format to write
    pub output_format: OutputFormat,
    /// Field delimiter for delimited text input; `None` picks one from the
    /// file extension (tab for `.tsv`, comma otherwise)
    pub delimiter: Option<u8>,
    /// Detect ISO date/datetime columns while parsing
    pub infer_dates: bool,
    /// Print a per-column before/after table
    pub show_summary: bool,
    /// Console report style
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            use_float16: false,
            datetime_columns: Vec::new(),
            output_format: OutputFormat::default(),
            delimiter: None,
            infer_dates: false,
            show_summary: false,
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config with a list of jobs
    pub fn new(jobs: Vec<ImportJob>) -> Self {
        Self {
            jobs,
            ..Default::default()
        }
    }

    /// Add a job
    pub fn with_job(mut self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        self.jobs
            .push(ImportJob::new(input.as_ref(), output.as_ref()));
        self
    }

    /// Enable 16-bit float narrowing
    pub fn with_float16(mut self, enabled: bool) -> Self {
        self.use_float16 = enabled;
        self
    }

    /// Set columns to coerce to datetime
    pub fn with_datetime_columns(mut self, columns: Vec<String>) -> Self {
        self.datetime_columns = columns;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the input field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Enable date detection while parsing
    pub fn with_infer_dates(mut self, enabled: bool) -> Self {
        self.infer_dates = enabled;
        self
    }

    /// Enable the per-column summary table
    pub fn with_summary(mut self, enabled: bool) -> Self {
        self.show_summary = enabled;
        self
    }

    /// Set report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Options for the reducer
    pub fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions::default().with_float16(self.use_float16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.use_float16);
        assert!(config.datetime_columns.is_empty());
        assert_eq!(config.output_format, OutputFormat::Feather);
        assert_eq!(config.delimiter, None);
    }

    #[test]
    fn test_job_beside_input() {
        let job = ImportJob::beside("data/train.csv", OutputFormat::Feather);
        assert_eq!(job.output, PathBuf::from("data/train.feather"));
        let job = ImportJob::beside("data/test.csv", OutputFormat::Parquet);
        assert_eq!(job.output, PathBuf::from("data/test.parquet"));
    }

    #[test]
    fn test_job_beside_never_targets_its_input() {
        let job = ImportJob::beside("data/train.feather", OutputFormat::Feather);
        assert_ne!(job.output, job.input);
        assert_eq!(job.output, PathBuf::from("data/train.reduced.feather"));

        let job = ImportJob::beside("data/train.PARQUET", OutputFormat::Parquet);
        assert_eq!(job.output, PathBuf::from("data/train.reduced.parquet"));

        // Converting between formats keeps the plain swap
        let job = ImportJob::beside("data/train.parquet", OutputFormat::Feather);
        assert_eq!(job.output, PathBuf::from("data/train.feather"));
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("Parquet".parse::<OutputFormat>(), Ok(OutputFormat::Parquet));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!(
            "json-pretty".parse::<ReportFormat>(),
            Ok(ReportFormat::JsonPretty)
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_job("a.csv", "a.feather")
            .with_float16(true)
            .with_datetime_columns(vec!["timestamp".to_string()]);
        assert_eq!(config.jobs.len(), 1);
        assert!(config.reduce_options().use_float16);
    }
}

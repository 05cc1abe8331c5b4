//! shrinkframe - Shrink tabular data before storing it as Feather

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use shrinkframe::config::{Config, ImportJob, OutputFormat, ReportFormat};
use shrinkframe::logging::setup_logging;
use shrinkframe::pipeline::run as run_jobs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Feather,
    Parquet,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Feather => OutputFormat::Feather,
            CliOutputFormat::Parquet => OutputFormat::Parquet,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Text,
    Json,
    JsonPretty,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Text => ReportFormat::Text,
            CliReportFormat::Json => ReportFormat::Json,
            CliReportFormat::JsonPretty => ReportFormat::JsonPretty,
        }
    }
}

/// Reduce the memory footprint of tabular files and store them as Feather
#[derive(Parser, Debug)]
#[command(name = "shrinkframe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input files (CSV, Feather or Parquet)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the input in the same position (default: input with the format's extension)
    #[arg(short, long)]
    output: Vec<PathBuf>,

    /// Allow 16-bit floats as a narrowing target
    #[arg(long)]
    float16: bool,

    /// Column(s) to convert to datetime (comma-separated)
    #[arg(short, long = "datetime-col", value_delimiter = ',')]
    datetime_col: Vec<String>,

    /// Columnar output format
    #[arg(short, long, value_enum, default_value = "feather")]
    format: CliOutputFormat,

    /// Field delimiter for CSV input (default: tab for .tsv, comma otherwise)
    #[arg(long)]
    delimiter: Option<char>,

    /// Detect date and datetime columns while reading CSV
    #[arg(long)]
    infer_dates: bool,

    /// Print a per-column before/after table
    #[arg(long)]
    summary: bool,

    /// Console report style
    #[arg(long, value_enum, default_value = "text")]
    report: CliReportFormat,

    /// Diagnostic log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    if cli.output.len() > cli.inputs.len() {
        bail!(
            "Got {} output paths for {} input files",
            cli.output.len(),
            cli.inputs.len()
        );
    }
    let delimiter = match cli.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => bail!("Delimiter must be a single ASCII character, got '{}'", c),
        None => None,
    };

    let output_format: OutputFormat = cli.format.into();
    let mut outputs = cli.output.into_iter();
    let jobs = cli
        .inputs
        .into_iter()
        .map(|input| match outputs.next() {
            Some(output) => ImportJob::new(input, output),
            None => ImportJob::beside(input, output_format),
        })
        .collect();

    let mut config = Config::new(jobs)
        .with_float16(cli.float16)
        .with_datetime_columns(cli.datetime_col)
        .with_output_format(output_format)
        .with_infer_dates(cli.infer_dates)
        .with_summary(cli.summary)
        .with_report_format(cli.report.into());
    if let Some(delimiter) = delimiter {
        config = config.with_delimiter(delimiter);
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_jobs(&config, &mut handle)?;
    handle.flush()?;

    Ok(())
}

//! Parser layer for reading tabular data into a `Table`

mod csv;
mod feather;
mod parquet;

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::{Config, OutputFormat};
use crate::model::Table;

pub use self::csv::{read_csv, CsvParser};
pub use self::feather::FeatherParser;
pub use self::parquet::ParquetParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(FeatherParser),
                Box::new(ParquetParser),
            ],
        }
    }

    /// Get a parser for the given file path.
    ///
    /// Falls back to sniffing the file content when the extension is unknown.
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        if let Some(detected) = detect_format(path) {
            for parser in &self.parsers {
                if parser.supports_extension(detected) {
                    return Ok(parser.as_ref());
                }
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let parser = self.get_parser(path)?;
        parser.parse(path, config)
    }
}

/// Parser for a columnar format written by this crate
pub fn parser_for_format(format: OutputFormat) -> Box<dyn Parser> {
    match format {
        OutputFormat::Feather => Box::new(FeatherParser),
        OutputFormat::Parquet => Box::new(ParquetParser),
    }
}

/// Detect file format from content (for files without a known extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 6];
    let bytes_read = file.read(&mut buffer).ok()?;

    if bytes_read < 4 {
        return None;
    }

    // Feather v2 / Arrow IPC file magic
    if bytes_read == 6 && &buffer == b"ARROW1" {
        return Some("feather");
    }

    // Check for Parquet magic bytes
    if &buffer[0..4] == b"PAR1" {
        return Some("parquet");
    }

    // Default to CSV
    Some("csv")
}

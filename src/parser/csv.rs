//! Delimited text parser with per-column kind inference

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use crate::coerce::parse_datetime;
use crate::config::Config;
use crate::model::{Column, ColumnData, InferredType, Table};

use super::Parser;

/// Parser for CSV files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));
        read_delimited(BufReader::new(file), delimiter, config.infer_dates)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// Delimiter implied by a file extension
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Read delimited text into a table, inferring a storage type per column.
///
/// Uses the configured delimiter, or a comma when none is set.
pub fn read_csv<R: Read>(reader: R, config: &Config) -> Result<Table> {
    read_delimited(reader, config.delimiter.unwrap_or(b','), config.infer_dates)
}

fn read_delimited<R: Read>(reader: R, delimiter: u8, infer_dates: bool) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    // Read headers
    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let names = dedup_names(headers.iter());

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];

    // Read rows
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header

        // Short rows are padded with missing values, extra fields dropped
        for (idx, values) in raw.iter_mut().enumerate() {
            values.push(record.get(idx).filter(|s| !is_missing(s)).map(str::to_owned));
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(raw)
        .map(|(name, values)| {
            let data = build_column(values, infer_dates);
            Column::new(name, data)
        })
        .collect();

    Ok(Table::new(columns)?)
}

/// Repeated header names get a `.N` suffix
fn dedup_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: FxHashMap<&'a str, usize> = FxHashMap::default();
    headers
        .map(|name| {
            let count = seen.entry(name).or_insert(0);
            let unique = if *count == 0 {
                name.to_string()
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

/// Tokens read as a missing value
fn is_missing(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || matches!(trimmed, "NA" | "N/A" | "NaN" | "nan" | "None")
}

/// Classify a single non-missing value
fn classify(s: &str, infer_dates: bool) -> InferredType {
    let trimmed = s.trim();

    if trimmed.parse::<i64>().is_ok() {
        return InferredType::Int;
    }
    if trimmed.parse::<f64>().is_ok() {
        return InferredType::Float;
    }
    if infer_dates && parse_datetime(trimmed).is_some() {
        return InferredType::DateTime;
    }
    InferredType::Text
}

/// Infer a column type from data
fn infer_type(values: &[Option<String>], infer_dates: bool) -> InferredType {
    let mut inferred = InferredType::Missing;
    for value in values.iter().flatten() {
        inferred = inferred.widen(classify(value, infer_dates));
        if inferred == InferredType::Text {
            break;
        }
    }
    inferred
}

fn parse_float(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn build_column(values: Vec<Option<String>>, infer_dates: bool) -> ColumnData {
    let has_missing = values.iter().any(Option::is_none);

    match infer_type(&values, infer_dates) {
        InferredType::Int if !has_missing => ColumnData::Int64(
            values
                .iter()
                .flatten()
                .filter_map(|s| s.trim().parse::<i64>().ok())
                .collect(),
        ),
        // Integers with gaps are stored as floats, NaN marking the gaps
        InferredType::Int | InferredType::Float | InferredType::Missing => {
            ColumnData::Float64(values.iter().map(parse_float).collect())
        }
        InferredType::DateTime => ColumnData::DateTime(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_datetime))
                .collect(),
        ),
        InferredType::Text => ColumnData::Text(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, DType};

    fn parse(text: &str) -> Table {
        read_csv(text.as_bytes(), &Config::default()).unwrap()
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("null"));
        assert!(is_missing("NULL"));
        assert!(is_missing("NA"));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
        assert!(!is_missing("none"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("42", false), InferredType::Int);
        assert_eq!(classify(" -7 ", false), InferredType::Int);
        assert_eq!(classify("3.14", false), InferredType::Float);
        assert_eq!(classify("1e5", false), InferredType::Float);
        assert_eq!(classify("2016-01-01", false), InferredType::Text);
        assert_eq!(classify("2016-01-01", true), InferredType::DateTime);
        assert_eq!(classify("hello", true), InferredType::Text);
    }

    #[test]
    fn test_infers_column_types() {
        let table = parse(
            "building_id,meter,reading,site,timestamp\n\
             1,0,0.5,north,2016-01-01 00:00:00\n\
             2,1,,south,2016-01-01 01:00:00\n\
             3,,2.25,north,2016-01-01 02:00:00\n",
        );
        assert_eq!(table.row_count(), 3);
        let dtypes: Vec<DType> = table.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            dtypes,
            vec![
                DType::Int64,
                DType::Float64,
                DType::Float64,
                DType::Object,
                DType::Object
            ]
        );
        let meter = table.column("meter").unwrap().data();
        assert_eq!(meter.value(2), CellValue::Float(f64::NAN));
        assert_eq!(meter.value(1), CellValue::Int(1));
    }

    #[test]
    fn test_infer_dates_option() {
        let config = Config::default().with_infer_dates(true);
        let table = read_csv(
            "timestamp,value\n2016-01-01 00:00:00,1\n,2\n".as_bytes(),
            &config,
        )
        .unwrap();
        let timestamp = table.column("timestamp").unwrap();
        assert_eq!(timestamp.dtype(), DType::DateTime);
        assert_eq!(timestamp.data().value(1), CellValue::Null);
    }

    #[test]
    fn test_all_missing_column_is_float() {
        let table = parse("a,b\n1,\n2,NA\n");
        assert_eq!(table.column("b").unwrap().dtype(), DType::Float64);
    }

    #[test]
    fn test_short_rows_and_duplicate_headers() {
        let table = parse("x,x,y\n1,2,3\n4\n");
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["x", "x.1", "y"]
        );
        // Padded numeric cells read as NaN, padded text cells as null
        assert_eq!(
            table.column("y").unwrap().data().value(1),
            CellValue::Float(f64::NAN)
        );

        let table = parse("id,site\n1,north\n2\n");
        let site = table.column("site").unwrap();
        assert_eq!(site.dtype(), DType::Object);
        assert_eq!(site.data().value(0), CellValue::Text("north"));
        assert_eq!(site.data().value(1), CellValue::Null);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = Config::default().with_delimiter(b'\t');
        let table = read_csv("a\tb\n1\tz\n".as_bytes(), &config).unwrap();
        assert_eq!(table.column("b").unwrap().dtype(), DType::Object);
    }

    #[test]
    fn test_tsv_extension_defaults_to_tab() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"meter\tsite\n1\tnorth\n").unwrap();

        let table = CsvParser.parse(file.path(), &Config::default()).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["meter", "site"]);

        // An explicit delimiter wins over the extension
        let config = Config::default().with_delimiter(b',');
        let table = CsvParser.parse(file.path(), &config).unwrap();
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_header_only_file() {
        let table = parse("a,b\n");
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }
}

//! Datetime coercion for caller-named columns

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{Result, ShrinkError};
use crate::model::{ColumnData, Table};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a datetime in one of the accepted formats.
///
/// Values outside the nanosecond timestamp range are rejected, since they
/// cannot be stored as `datetime64[ns]`.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    parsed.and_utc().timestamp_nanos_opt().map(|_| parsed)
}

/// A column that could not be turned into datetimes
#[derive(Debug)]
pub struct CoercionFailure {
    pub column: String,
    pub error: ShrinkError,
}

/// Coerce one column to datetime in place
pub fn coerce_column(table: &mut Table, name: &str) -> Result<()> {
    let column = table
        .column_mut(name)
        .ok_or_else(|| ShrinkError::ColumnNotFound {
            column: name.to_string(),
        })?;

    let parsed = match column.data() {
        ColumnData::DateTime(_) => return Ok(()),
        ColumnData::Text(values) => parse_all(name, values.iter().map(Option::as_deref))?,
        ColumnData::Categorical(cat) => parse_all(name, cat.iter())?,
        other => {
            return Err(ShrinkError::NotCoercible {
                column: name.to_string(),
                dtype: other.dtype(),
            })
        }
    };

    column.replace_data(ColumnData::DateTime(parsed))
}

fn parse_all<'a>(
    column: &str,
    values: impl Iterator<Item = Option<&'a str>>,
) -> Result<Vec<Option<NaiveDateTime>>> {
    values
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(raw) => parse_datetime(raw)
                .map(Some)
                .ok_or_else(|| ShrinkError::UnparsableDatetime {
                    column: column.to_string(),
                    value: raw.to_string(),
                    row,
                }),
        })
        .collect()
}

/// Coerce each named column, collecting failures instead of stopping.
///
/// A failed column keeps its original storage.
pub fn coerce_datetime_columns(table: &mut Table, columns: &[String]) -> Vec<CoercionFailure> {
    let mut failures = Vec::new();

    for name in columns {
        match coerce_column(table, name) {
            Ok(()) => debug!(column = %name, "coerced column to datetime"),
            Err(error) => {
                warn!(column = %name, %error, "datetime coercion failed");
                failures.push(CoercionFailure {
                    column: name.clone(),
                    error,
                });
            }
        }
    }

    failures
}

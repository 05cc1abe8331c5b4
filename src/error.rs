//! Error types for shrinkframe
//!
//! Library-level failures are typed with `thiserror`; the pipeline and the
//! binary wrap them in `anyhow` with file context.

use arrow::datatypes::DataType as ArrowType;
use thiserror::Error;

use crate::model::DType;

/// Main error type for table operations
#[derive(Error, Debug)]
pub enum ShrinkError {
    /// Column not found in the table
    #[error("Column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// Column holds values that cannot be turned into datetimes
    #[error("Column '{column}' has dtype {dtype} and cannot be coerced to datetime")]
    NotCoercible { column: String, dtype: DType },

    /// A value failed every accepted datetime format
    #[error("Column '{column}': cannot parse '{value}' at row {row} as datetime")]
    UnparsableDatetime {
        column: String,
        value: String,
        row: usize,
    },

    /// Columnar file holds a type with no in-memory counterpart
    #[error("Column '{column}' has unsupported Arrow type {data_type}")]
    UnsupportedArrowType {
        column: String,
        data_type: ArrowType,
    },

    /// Column length disagrees with the table
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Dictionary code points outside the category list
    #[error("Column '{column}' has category code {code} but only {categories} categories")]
    InvalidCategoryCode {
        column: String,
        code: i64,
        categories: usize,
    },

    /// Reloaded table does not match what was written
    #[error("Round-trip mismatch: {0}")]
    RoundTrip(String),

    /// Arrow array or IPC error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// File I/O error
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for table operations
pub type Result<T> = std::result::Result<T, ShrinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ShrinkError::ColumnNotFound {
            column: "timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'timestamp' not found in table");

        let err = ShrinkError::NotCoercible {
            column: "meter".to_string(),
            dtype: DType::Int64,
        };
        assert_eq!(
            err.to_string(),
            "Column 'meter' has dtype int64 and cannot be coerced to datetime"
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShrinkError = io_err.into();
        assert!(matches!(err, ShrinkError::Io(_)));
    }
}

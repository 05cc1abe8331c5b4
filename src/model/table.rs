//! Table, Column, and typed column storage

use chrono::NaiveDateTime;
use half::f16;

use crate::error::{Result, ShrinkError};

use super::categorical::Categorical;
use super::schema::{ColumnKind, DType};

/// A single cell, borrowed from its column
#[derive(Debug, Clone, Copy)]
pub enum CellValue<'a> {
    Null,
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Text(&'a str),
}

impl PartialEq for CellValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl std::fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "NULL"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Typed storage for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    /// NaN marks a missing value in float columns
    Float64(Vec<f64>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
    Categorical(Categorical),
}

impl ColumnData {
    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int8(v) => v.len(),
            ColumnData::Int16(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float16(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Categorical(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concrete storage type
    pub fn dtype(&self) -> DType {
        match self {
            ColumnData::Int8(_) => DType::Int8,
            ColumnData::Int16(_) => DType::Int16,
            ColumnData::Int32(_) => DType::Int32,
            ColumnData::Int64(_) => DType::Int64,
            ColumnData::Float16(_) => DType::Float16,
            ColumnData::Float32(_) => DType::Float32,
            ColumnData::Float64(_) => DType::Float64,
            ColumnData::DateTime(_) => DType::DateTime,
            ColumnData::Text(_) => DType::Object,
            ColumnData::Categorical(_) => DType::Category,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.dtype().kind()
    }

    /// Size in bytes of the column's buffers.
    ///
    /// Fixed-width columns count their value width (datetimes as 64-bit
    /// nanoseconds). Text counts its per-row slot plus the UTF-8 bytes of
    /// each value.
    pub fn memory_usage(&self) -> usize {
        match self {
            ColumnData::Text(values) => values
                .iter()
                .map(|v| std::mem::size_of::<Option<String>>() + v.as_ref().map_or(0, String::len))
                .sum(),
            ColumnData::Categorical(c) => c.memory_usage(),
            other => {
                let width = other.dtype().byte_width().unwrap_or(0);
                other.len() * width
            }
        }
    }

    /// Widened copy of an integer column
    pub fn int_values(&self) -> Option<Vec<i64>> {
        match self {
            ColumnData::Int8(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int16(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int32(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int64(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Widened copy of a float column
    pub fn float_values(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Float16(v) => Some(v.iter().map(|x| x.to_f64()).collect()),
            ColumnData::Float32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ColumnData::Float64(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Cell at `row`; out-of-range rows read as null
    pub fn value(&self, row: usize) -> CellValue<'_> {
        let cell = match self {
            ColumnData::Int8(v) => v.get(row).map(|&x| CellValue::Int(x as i64)),
            ColumnData::Int16(v) => v.get(row).map(|&x| CellValue::Int(x as i64)),
            ColumnData::Int32(v) => v.get(row).map(|&x| CellValue::Int(x as i64)),
            ColumnData::Int64(v) => v.get(row).map(|&x| CellValue::Int(x)),
            ColumnData::Float16(v) => v.get(row).map(|x| CellValue::Float(x.to_f64())),
            ColumnData::Float32(v) => v.get(row).map(|&x| CellValue::Float(x as f64)),
            ColumnData::Float64(v) => v.get(row).map(|&x| CellValue::Float(x)),
            ColumnData::DateTime(v) => v.get(row).copied().flatten().map(CellValue::DateTime),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|s| s.as_deref())
                .map(CellValue::Text),
            ColumnData::Categorical(c) => c.get(row).map(CellValue::Text),
        };
        cell.unwrap_or(CellValue::Null)
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.data.memory_usage()
    }

    /// Retype the column in place. The row count must not change.
    pub fn replace_data(&mut self, data: ColumnData) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(ShrinkError::LengthMismatch {
                column: self.name.clone(),
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Retype through a length-preserving conversion
    pub(crate) fn retype(&mut self, convert: impl FnOnce(ColumnData) -> ColumnData) {
        let data = std::mem::replace(&mut self.data, ColumnData::Int64(Vec::new()));
        self.data = convert(data);
    }
}

/// An ordered collection of equally long columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking that every column has the same row count
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::default();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(ShrinkError::LengthMismatch {
                    column: column.name.clone(),
                    expected: first.len(),
                    actual: column.len(),
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access to the columns; `Column::replace_data` keeps row counts fixed
    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get mutable column by name
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total footprint in bytes across all columns
    pub fn memory_usage(&self) -> usize {
        self.columns.iter().map(Column::memory_usage).sum()
    }
}

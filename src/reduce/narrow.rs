//! Range tests and casts for numeric narrowing
//!
//! Every bounds test is strict: a column whose minimum equals `T::MIN` or
//! whose maximum equals `T::MAX` is not stored as `T`; a boundary value moves
//! the column to the next wider type.

use half::f16;

use crate::model::ColumnData;

/// Candidate integer widths, narrowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    /// Width of an existing integer column
    pub fn of(data: &ColumnData) -> Option<Self> {
        match data {
            ColumnData::Int8(_) => Some(IntWidth::I8),
            ColumnData::Int16(_) => Some(IntWidth::I16),
            ColumnData::Int32(_) => Some(IntWidth::I32),
            ColumnData::Int64(_) => Some(IntWidth::I64),
            _ => None,
        }
    }
}

/// Candidate float widths, narrowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FloatWidth {
    F16,
    F32,
    F64,
}

impl FloatWidth {
    /// Width of an existing float column
    pub fn of(data: &ColumnData) -> Option<Self> {
        match data {
            ColumnData::Float16(_) => Some(FloatWidth::F16),
            ColumnData::Float32(_) => Some(FloatWidth::F32),
            ColumnData::Float64(_) => Some(FloatWidth::F64),
            _ => None,
        }
    }
}

fn strictly_within(min: i64, max: i64, lo: i64, hi: i64) -> bool {
    min > lo && max < hi
}

/// Narrowest integer width whose strict bounds test passes
pub fn narrowest_int(min: i64, max: i64) -> IntWidth {
    if strictly_within(min, max, i8::MIN as i64, i8::MAX as i64) {
        IntWidth::I8
    } else if strictly_within(min, max, i16::MIN as i64, i16::MAX as i64) {
        IntWidth::I16
    } else if strictly_within(min, max, i32::MIN as i64, i32::MAX as i64) {
        IntWidth::I32
    } else {
        IntWidth::I64
    }
}

/// Narrowest float width whose strict finite-range test passes.
///
/// `range` is `None` when the column holds no non-NaN value; such columns
/// stay 64-bit.
pub fn narrowest_float(range: Option<(f64, f64)>, allow_f16: bool) -> FloatWidth {
    let Some((min, max)) = range else {
        return FloatWidth::F64;
    };

    if allow_f16 && min > f16::MIN.to_f64() && max < f16::MAX.to_f64() {
        FloatWidth::F16
    } else if min > f32::MIN as f64 && max < f32::MAX as f64 {
        FloatWidth::F32
    } else {
        FloatWidth::F64
    }
}

/// Minimum and maximum of an integer column
pub fn int_range(values: &[i64]) -> Option<(i64, i64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Minimum and maximum of a float column, skipping NaN
pub fn float_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Store integer values at `width`. Callers pass a width chosen by
/// [`narrowest_int`], so every value fits.
pub fn cast_int(values: Vec<i64>, width: IntWidth) -> ColumnData {
    match width {
        IntWidth::I8 => ColumnData::Int8(values.into_iter().map(|v| v as i8).collect()),
        IntWidth::I16 => ColumnData::Int16(values.into_iter().map(|v| v as i16).collect()),
        IntWidth::I32 => ColumnData::Int32(values.into_iter().map(|v| v as i32).collect()),
        IntWidth::I64 => ColumnData::Int64(values),
    }
}

/// Store float values at `width`, rounding to nearest
pub fn cast_float(values: Vec<f64>, width: FloatWidth) -> ColumnData {
    match width {
        FloatWidth::F16 => ColumnData::Float16(values.into_iter().map(f16::from_f64).collect()),
        FloatWidth::F32 => ColumnData::Float32(values.into_iter().map(|v| v as f32).collect()),
        FloatWidth::F64 => ColumnData::Float64(values),
    }
}

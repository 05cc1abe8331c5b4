//! Memory-usage reducer
//!
//! Walks a table column by column and retypes each one to the narrowest
//! representation that keeps its values: integers to the smallest signed
//! width, floats to the smallest finite float width, text to a categorical.
//! Datetime columns are left alone.

mod narrow;
mod report;

use tracing::debug;

use crate::model::{Categorical, Column, ColumnData, ColumnKind, Table};

pub use narrow::{
    cast_float, cast_int, float_range, int_range, narrowest_float, narrowest_int, FloatWidth,
    IntWidth,
};
pub use report::{bytes_to_mb, ColumnReport, MemoryReport};

/// Options for a reduction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Allow 16-bit floats as a narrowing target
    pub use_float16: bool,
}

impl ReduceOptions {
    pub fn with_float16(mut self, enabled: bool) -> Self {
        self.use_float16 = enabled;
        self
    }
}

/// Narrow every column of `table` in place and report the memory saved
pub fn reduce_mem_usage(table: &mut Table, options: &ReduceOptions) -> MemoryReport {
    let before_bytes = table.memory_usage();

    let columns: Vec<ColumnReport> = table
        .columns_mut()
        .iter_mut()
        .map(|column| reduce_column(column, options))
        .collect();

    let after_bytes = table.memory_usage();
    debug!(before_bytes, after_bytes, "reduced table");

    MemoryReport {
        before_bytes,
        after_bytes,
        columns,
    }
}

/// Narrow a single column in place
pub fn reduce_column(column: &mut Column, options: &ReduceOptions) -> ColumnReport {
    let before = column.dtype();
    let before_bytes = column.memory_usage();

    match column.kind() {
        ColumnKind::DateTime => {}
        ColumnKind::Integer => column.retype(reduce_integer),
        ColumnKind::Float => column.retype(|data| reduce_float(data, options.use_float16)),
        ColumnKind::Other => column.retype(reduce_other),
    }

    let after = column.dtype();
    if before != after {
        debug!(column = column.name(), from = %before, to = %after, "narrowed column");
    }

    ColumnReport {
        name: column.name().to_string(),
        before,
        after,
        before_bytes,
        after_bytes: column.memory_usage(),
    }
}

// A column is never stored wider than it already is, so narrowed input
// (e.g. a reloaded Feather file) keeps its width at a strict boundary.

fn reduce_integer(data: ColumnData) -> ColumnData {
    let (Some(current), Some(values)) = (IntWidth::of(&data), data.int_values()) else {
        return data;
    };
    // No rows: nothing to measure, keep the storage as is
    let Some((min, max)) = int_range(&values) else {
        return data;
    };
    match narrowest_int(min, max) {
        width if width < current => cast_int(values, width),
        _ => data,
    }
}

fn reduce_float(data: ColumnData, use_float16: bool) -> ColumnData {
    let (Some(current), Some(values)) = (FloatWidth::of(&data), data.float_values()) else {
        return data;
    };
    // No finite values to measure
    let Some(range) = float_range(&values) else {
        return data;
    };
    match narrowest_float(Some(range), use_float16) {
        width if width < current => cast_float(values, width),
        _ => data,
    }
}

fn reduce_other(data: ColumnData) -> ColumnData {
    match data {
        ColumnData::Text(values) => {
            ColumnData::Categorical(Categorical::from_values(values.iter().map(Option::as_deref)))
        }
        other => other,
    }
}

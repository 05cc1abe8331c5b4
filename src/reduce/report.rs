//! Memory footprint accounting for a reduction pass

use serde::{Deserialize, Serialize};

use crate::model::DType;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to mebibytes
pub fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Before/after storage of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub before: DType,
    pub after: DType,
    pub before_bytes: usize,
    pub after_bytes: usize,
}

impl ColumnReport {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Aggregate result of reducing a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub before_bytes: usize,
    pub after_bytes: usize,
    pub columns: Vec<ColumnReport>,
}

impl MemoryReport {
    pub fn before_mb(&self) -> f64 {
        bytes_to_mb(self.before_bytes)
    }

    pub fn after_mb(&self) -> f64 {
        bytes_to_mb(self.after_bytes)
    }

    /// Percentage reduction; 0 for an empty table
    pub fn decrease_pct(&self) -> f64 {
        if self.before_bytes == 0 {
            return 0.0;
        }
        100.0 * (self.before_bytes as f64 - self.after_bytes as f64) / self.before_bytes as f64
    }

    /// Columns whose storage type changed
    pub fn changed_columns(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns.iter().filter(|c| c.changed())
    }
}

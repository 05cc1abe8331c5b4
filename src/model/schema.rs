//! Column kinds and storage types

use serde::{Deserialize, Serialize};

/// Coarse kind of a column, used to pick a narrowing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    DateTime,
    Integer,
    Float,
    Other,
}

/// Concrete storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float16")]
    Float16,
    #[serde(rename = "float32")]
    Float32,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "datetime64[ns]")]
    DateTime,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "category")]
    Category,
}

impl DType {
    /// Kind this storage type belongs to
    pub fn kind(self) -> ColumnKind {
        match self {
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => ColumnKind::Integer,
            DType::Float16 | DType::Float32 | DType::Float64 => ColumnKind::Float,
            DType::DateTime => ColumnKind::DateTime,
            DType::Object | DType::Category => ColumnKind::Other,
        }
    }

    /// Bytes per value for fixed-width types
    pub fn byte_width(self) -> Option<usize> {
        match self {
            DType::Int8 => Some(1),
            DType::Int16 | DType::Float16 => Some(2),
            DType::Int32 | DType::Float32 => Some(4),
            DType::Int64 | DType::Float64 | DType::DateTime => Some(8),
            DType::Object | DType::Category => None,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::Int8 => write!(f, "int8"),
            DType::Int16 => write!(f, "int16"),
            DType::Int32 => write!(f, "int32"),
            DType::Int64 => write!(f, "int64"),
            DType::Float16 => write!(f, "float16"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
            DType::DateTime => write!(f, "datetime64[ns]"),
            DType::Object => write!(f, "object"),
            DType::Category => write!(f, "category"),
        }
    }
}

/// Type inferred for a column of raw text while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InferredType {
    /// Only missing values seen so far
    #[default]
    Missing,
    Int,
    Float,
    DateTime,
    Text,
}

impl InferredType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: InferredType) -> InferredType {
        if self == other {
            return self;
        }

        match (self, other) {
            (InferredType::Missing, t) | (t, InferredType::Missing) => t,
            (InferredType::Int, InferredType::Float) | (InferredType::Float, InferredType::Int) => {
                InferredType::Float
            }
            _ => InferredType::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(InferredType::Missing.widen(InferredType::Int), InferredType::Int);
        assert_eq!(InferredType::Int.widen(InferredType::Float), InferredType::Float);
        assert_eq!(InferredType::Float.widen(InferredType::Int), InferredType::Float);
        assert_eq!(InferredType::Int.widen(InferredType::DateTime), InferredType::Text);
        assert_eq!(InferredType::Text.widen(InferredType::Missing), InferredType::Text);
    }

    #[test]
    fn test_dtype_kind_and_display() {
        assert_eq!(DType::Int16.kind(), ColumnKind::Integer);
        assert_eq!(DType::Float16.kind(), ColumnKind::Float);
        assert_eq!(DType::Category.kind(), ColumnKind::Other);
        assert_eq!(DType::DateTime.to_string(), "datetime64[ns]");
        assert_eq!(DType::Category.byte_width(), None);
        assert_eq!(
            serde_json::to_string(&DType::Float32).unwrap(),
            "\"float32\""
        );
    }
}

//! Data model for in-memory tables

mod categorical;
mod schema;
mod table;

pub use categorical::{Categorical, CategoryCodes};
pub use schema::{ColumnKind, DType, InferredType};
pub use table::{CellValue, Column, ColumnData, Table};

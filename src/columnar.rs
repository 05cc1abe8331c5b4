//! Conversion between in-memory tables and Arrow record batches
//!
//! Every storage variant has a direct Arrow counterpart, so a reduced table
//! survives a Feather or Parquet round trip with its narrowed types intact:
//!
//! | storage     | Arrow type                         |
//! |-------------|------------------------------------|
//! | IntN        | `IntN`                             |
//! | FloatN      | `FloatN`                           |
//! | DateTime    | `Timestamp(Nanosecond, None)`      |
//! | Text        | `Utf8`                             |
//! | Categorical | `Dictionary(Int8/16/32, Utf8)`     |

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, DictionaryArray, Float16Array, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, RecordBatch, RecordBatchOptions, StringArray,
    TimestampNanosecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowDictionaryKeyType, DataType as ArrowType, Field, Float16Type, Float32Type, Float64Type,
    Int16Type, Int32Type, Int64Type, Int8Type, Schema, TimeUnit, TimestampNanosecondType,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use chrono::{DateTime, NaiveDateTime};
use half::f16;

use crate::error::{Result, ShrinkError};
use crate::model::{Categorical, CategoryCodes, Column, ColumnData, Table};

/// Convert a table into a single record batch
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.column_count());
    let mut arrays = Vec::with_capacity(table.column_count());

    for (idx, column) in table.columns().iter().enumerate() {
        let array = column_to_array(column.data())?;
        let data_type = array.data_type().clone();
        // IPC files reject two dictionaries sharing an id
        let field = if matches!(data_type, ArrowType::Dictionary(_, _)) {
            Field::new_dict(column.name(), data_type, true, idx as i64, false)
        } else {
            Field::new(column.name(), data_type, true)
        };
        fields.push(field);
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
    Ok(batch)
}

fn column_to_array(data: &ColumnData) -> Result<ArrayRef> {
    let array: ArrayRef = match data {
        ColumnData::Int8(v) => Arc::new(Int8Array::from_iter_values(v.iter().copied())),
        ColumnData::Int16(v) => Arc::new(Int16Array::from_iter_values(v.iter().copied())),
        ColumnData::Int32(v) => Arc::new(Int32Array::from_iter_values(v.iter().copied())),
        ColumnData::Int64(v) => Arc::new(Int64Array::from_iter_values(v.iter().copied())),
        ColumnData::Float16(v) => Arc::new(Float16Array::from_iter_values(v.iter().copied())),
        ColumnData::Float32(v) => Arc::new(Float32Array::from_iter_values(v.iter().copied())),
        ColumnData::Float64(v) => Arc::new(Float64Array::from_iter_values(v.iter().copied())),
        ColumnData::DateTime(v) => Arc::new(TimestampNanosecondArray::from(
            v.iter()
                .map(|dt| dt.and_then(|dt| dt.and_utc().timestamp_nanos_opt()))
                .collect::<Vec<_>>(),
        )),
        ColumnData::Text(v) => Arc::new(v.iter().map(Option::as_deref).collect::<StringArray>()),
        ColumnData::Categorical(cat) => categorical_to_array(cat)?,
    };
    Ok(array)
}

fn categorical_to_array(cat: &Categorical) -> Result<ArrayRef> {
    let values: ArrayRef = Arc::new(StringArray::from_iter_values(
        cat.categories().iter().map(|c| &**c),
    ));

    // Negative codes are missing values
    let array: ArrayRef = match cat.codes() {
        CategoryCodes::Int8(codes) => {
            let keys: Int8Array = codes.iter().map(|&c| (c >= 0).then_some(c)).collect();
            Arc::new(DictionaryArray::<Int8Type>::try_new(keys, values)?)
        }
        CategoryCodes::Int16(codes) => {
            let keys: Int16Array = codes.iter().map(|&c| (c >= 0).then_some(c)).collect();
            Arc::new(DictionaryArray::<Int16Type>::try_new(keys, values)?)
        }
        CategoryCodes::Int32(codes) => {
            let keys: Int32Array = codes.iter().map(|&c| (c >= 0).then_some(c)).collect();
            Arc::new(DictionaryArray::<Int32Type>::try_new(keys, values)?)
        }
    };
    Ok(array)
}

/// Convert a record batch back into a table
pub fn record_batch_to_table(batch: &RecordBatch) -> Result<Table> {
    let schema = batch.schema();
    let columns = schema
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, array)| {
            let data = array_to_column_data(field.name(), array)?;
            Ok(Column::new(field.name().clone(), data))
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(columns)
}

fn array_to_column_data(name: &str, array: &ArrayRef) -> Result<ColumnData> {
    // Integer columns with gaps are stored as floats, NaN marking the gaps
    let is_integer = matches!(
        array.data_type(),
        ArrowType::Int8
            | ArrowType::Int16
            | ArrowType::Int32
            | ArrowType::Int64
            | ArrowType::UInt8
            | ArrowType::UInt16
            | ArrowType::UInt32
            | ArrowType::UInt64
    );
    if is_integer && array.null_count() > 0 {
        return nullable_as_float(array);
    }

    let data = match array.data_type() {
        ArrowType::Int8 => ColumnData::Int8(array.as_primitive::<Int8Type>().values().to_vec()),
        ArrowType::Int16 => ColumnData::Int16(array.as_primitive::<Int16Type>().values().to_vec()),
        ArrowType::Int32 => ColumnData::Int32(array.as_primitive::<Int32Type>().values().to_vec()),
        ArrowType::Int64 => ColumnData::Int64(array.as_primitive::<Int64Type>().values().to_vec()),
        // Unsigned types widen to the next signed width
        ArrowType::UInt8 => {
            let values = array.as_primitive::<UInt8Type>().values();
            ColumnData::Int16(values.iter().map(|&x| x as i16).collect())
        }
        ArrowType::UInt16 => {
            let values = array.as_primitive::<UInt16Type>().values();
            ColumnData::Int32(values.iter().map(|&x| x as i32).collect())
        }
        ArrowType::UInt32 => {
            let values = array.as_primitive::<UInt32Type>().values();
            ColumnData::Int64(values.iter().map(|&x| x as i64).collect())
        }
        ArrowType::UInt64 => {
            let values = array.as_primitive::<UInt64Type>().values();
            match values
                .iter()
                .map(|&x| i64::try_from(x))
                .collect::<std::result::Result<Vec<_>, _>>()
            {
                Ok(values) => ColumnData::Int64(values),
                Err(_) => return nullable_as_float(array),
            }
        }
        ArrowType::Float16 => {
            let arr = array.as_primitive::<Float16Type>();
            ColumnData::Float16(arr.iter().map(|v| v.unwrap_or(f16::NAN)).collect())
        }
        ArrowType::Float32 => {
            let arr = array.as_primitive::<Float32Type>();
            ColumnData::Float32(arr.iter().map(|v| v.unwrap_or(f32::NAN)).collect())
        }
        ArrowType::Float64 => {
            let arr = array.as_primitive::<Float64Type>();
            ColumnData::Float64(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        }
        ArrowType::Null => ColumnData::Float64(vec![f64::NAN; array.len()]),
        ArrowType::Timestamp(_, _) | ArrowType::Date32 | ArrowType::Date64 => {
            let nanos = cast(array, &ArrowType::Timestamp(TimeUnit::Nanosecond, None))?;
            let arr = nanos.as_primitive::<TimestampNanosecondType>();
            ColumnData::DateTime(arr.iter().map(|v| v.map(nanos_to_datetime)).collect())
        }
        ArrowType::Utf8 => text_column(array.as_string::<i32>()),
        ArrowType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            ColumnData::Text(arr.iter().map(|v| v.map(str::to_owned)).collect())
        }
        ArrowType::Dictionary(key, value) if value.as_ref() == &ArrowType::Utf8 => {
            match key.as_ref() {
                ArrowType::Int8 => {
                    dictionary_column(name, array.as_dictionary::<Int8Type>(), CategoryCodes::Int8)?
                }
                ArrowType::Int16 => dictionary_column(
                    name,
                    array.as_dictionary::<Int16Type>(),
                    CategoryCodes::Int16,
                )?,
                ArrowType::Int32 => dictionary_column(
                    name,
                    array.as_dictionary::<Int32Type>(),
                    CategoryCodes::Int32,
                )?,
                _ => reencode_dictionary(array)?,
            }
        }
        ArrowType::Dictionary(_, value) if value.as_ref() == &ArrowType::LargeUtf8 => {
            reencode_dictionary(array)?
        }
        other => {
            return Err(ShrinkError::UnsupportedArrowType {
                column: name.to_string(),
                data_type: other.clone(),
            })
        }
    };
    Ok(data)
}

fn nanos_to_datetime(nanos: i64) -> NaiveDateTime {
    DateTime::from_timestamp_nanos(nanos).naive_utc()
}

fn nullable_as_float(array: &ArrayRef) -> Result<ColumnData> {
    let floats = cast(array, &ArrowType::Float64)?;
    let arr = floats.as_primitive::<Float64Type>();
    Ok(ColumnData::Float64(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect()))
}

fn text_column(arr: &StringArray) -> ColumnData {
    ColumnData::Text(arr.iter().map(|v| v.map(str::to_owned)).collect())
}

fn dictionary_column<K>(
    name: &str,
    dict: &DictionaryArray<K>,
    wrap: impl FnOnce(Vec<K::Native>) -> CategoryCodes,
) -> Result<ColumnData>
where
    K: ArrowDictionaryKeyType,
    K::Native: From<i8>,
{
    let values = dict.values().as_string_opt::<i32>().ok_or_else(|| {
        ShrinkError::UnsupportedArrowType {
            column: name.to_string(),
            data_type: dict.data_type().clone(),
        }
    })?;
    let categories: Vec<Box<str>> = (0..values.len())
        .map(|i| Box::from(values.value(i)))
        .collect();

    let missing = K::Native::from(-1);
    let codes: Vec<K::Native> = dict.keys().iter().map(|k| k.unwrap_or(missing)).collect();

    let cat = Categorical::try_new(name, categories, wrap(codes))?;
    Ok(ColumnData::Categorical(cat))
}

/// Decode a dictionary with an unusual key or value type and encode it again
fn reencode_dictionary(array: &ArrayRef) -> Result<ColumnData> {
    let decoded = cast(array, &ArrowType::Utf8)?;
    let strings = decoded.as_string::<i32>();
    Ok(ColumnData::Categorical(Categorical::from_values(strings.iter())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, DType};
    use chrono::NaiveDate;

    fn sample_table() -> Table {
        let ts = NaiveDate::from_ymd_opt(2016, 1, 1).and_then(|d| d.and_hms_opt(6, 30, 0));
        Table::new(vec![
            Column::new("i8", ColumnData::Int8(vec![-5, 0, 100])),
            Column::new("i32", ColumnData::Int32(vec![70_000, 0, -1])),
            Column::new(
                "f16",
                ColumnData::Float16(vec![f16::from_f32(1.5), f16::NAN, f16::from_f32(-2.0)]),
            ),
            Column::new("f64", ColumnData::Float64(vec![1e300, 0.25, f64::NAN])),
            Column::new("ts", ColumnData::DateTime(vec![ts, None, ts])),
            Column::new(
                "text",
                ColumnData::Text(vec![Some("a".into()), None, Some("b".into())]),
            ),
            Column::new(
                "cat",
                ColumnData::Categorical(Categorical::from_values(vec![
                    Some("x"),
                    Some("y"),
                    None,
                ])),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_record_batch_roundtrip() {
        let table = sample_table();
        let batch = table_to_record_batch(&table).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 7);
        assert_eq!(
            batch.schema().field(6).data_type(),
            &ArrowType::Dictionary(Box::new(ArrowType::Int8), Box::new(ArrowType::Utf8))
        );

        let back = record_batch_to_table(&batch).unwrap();
        assert_eq!(
            back.column_names().collect::<Vec<_>>(),
            table.column_names().collect::<Vec<_>>()
        );
        for (a, b) in table.columns().iter().zip(back.columns()) {
            assert_eq!(a.dtype(), b.dtype(), "column {}", a.name());
            for row in 0..table.row_count() {
                assert_eq!(
                    a.data().value(row),
                    b.data().value(row),
                    "{} row {}",
                    a.name(),
                    row
                );
            }
        }
    }

    #[test]
    fn test_several_dictionaries_in_one_ipc_file() {
        use arrow::ipc::reader::FileReader;
        use arrow::ipc::writer::FileWriter;
        use std::io::Cursor;

        let table = Table::new(vec![
            Column::new(
                "site",
                ColumnData::Categorical(Categorical::from_values(vec![Some("n"), Some("s")])),
            ),
            Column::new(
                "usage",
                ColumnData::Categorical(Categorical::from_values(vec![Some("office"), None])),
            ),
        ])
        .unwrap();
        let batch = table_to_record_batch(&table).unwrap();

        let mut buf = Vec::new();
        let mut writer = FileWriter::try_new(&mut buf, batch.schema().as_ref()).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let reader = FileReader::try_new(Cursor::new(buf), None).unwrap();
        let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<_, _>>().unwrap();
        let back = record_batch_to_table(&batches[0]).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_empty_table_roundtrip() {
        let batch = table_to_record_batch(&Table::default()).unwrap();
        assert_eq!(batch.num_columns(), 0);
        let back = record_batch_to_table(&batch).unwrap();
        assert_eq!(back.column_count(), 0);
    }

    #[test]
    fn test_nullable_ints_widen_to_float() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None]));
        let data = array_to_column_data("n", &array).unwrap();
        assert_eq!(data.dtype(), DType::Float64);
        assert_eq!(data.value(1), CellValue::Float(f64::NAN));
    }

    #[test]
    fn test_unsigned_widening() {
        let array: ArrayRef = Arc::new(arrow::array::UInt8Array::from(vec![255u8, 0]));
        let data = array_to_column_data("u", &array).unwrap();
        assert_eq!(data.dtype(), DType::Int16);
        assert_eq!(data.value(0), CellValue::Int(255));
    }

    #[test]
    fn test_unsupported_type() {
        let array: ArrayRef = Arc::new(arrow::array::BooleanArray::from(vec![true]));
        let err = array_to_column_data("flag", &array).unwrap_err();
        assert!(matches!(err, ShrinkError::UnsupportedArrowType { .. }));
    }
}

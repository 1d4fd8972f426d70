//! Conversion of enumerated host values into Arrow record batches.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType as ArrowDataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::{HostSchemaError, Result};
use crate::types::{DataType, RelDataType, Value};

/// Derives the Arrow schema for a relation.
///
/// Struct rows map to one column per field; any other row type maps to a
/// single column named after the relation.
#[must_use]
pub fn row_type_to_arrow(relation: &str, row_type: &RelDataType) -> Schema {
    match row_type {
        RelDataType::Struct(fields) => Schema::new(
            fields
                .iter()
                .map(|f| Field::new(&f.name, reltype_to_arrow(&f.data_type), true))
                .collect::<Vec<_>>(),
        ),
        other => Schema::new(vec![Field::new(relation, reltype_to_arrow(other), true)]),
    }
}

/// Converts a relational column type to an Arrow type.
///
/// Types without a columnar counterpart are rendered as strings.
#[must_use]
pub fn reltype_to_arrow(rel_type: &RelDataType) -> ArrowDataType {
    match rel_type {
        RelDataType::Scalar(dt) => dt.to_arrow(),
        RelDataType::Struct(_) | RelDataType::Collection(_) | RelDataType::Any => {
            ArrowDataType::Utf8
        }
    }
}

/// Builds a record batch from relation rows.
///
/// # Errors
///
/// Returns `TypeError` if a row does not match `row_type`.
pub fn values_to_batch(
    schema: SchemaRef,
    row_type: &RelDataType,
    rows: &[Value],
) -> Result<RecordBatch> {
    let columns = match row_type {
        RelDataType::Struct(fields) => fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let cells = rows
                    .iter()
                    .map(|row| record_field(row, i))
                    .collect::<Result<Vec<_>>>()?;
                build_column(&field.data_type, &cells)
            })
            .collect::<Result<Vec<_>>>()?,
        other => vec![build_column(other, &rows.iter().collect::<Vec<_>>())?],
    };
    RecordBatch::try_new(schema, columns)
        .map_err(|e| HostSchemaError::ExecutionError(format!("Failed to build batch: {e}")))
}

fn record_field(row: &Value, index: usize) -> Result<&Value> {
    let fields = row.as_record().ok_or_else(|| HostSchemaError::TypeError {
        expected: "Record".to_string(),
        actual: row.runtime_type_name(),
    })?;
    fields.get(index).ok_or_else(|| HostSchemaError::TypeError {
        expected: format!("Record with at least {} fields", index + 1),
        actual: format!("Record with {} fields", fields.len()),
    })
}

fn build_column(rel_type: &RelDataType, cells: &[&Value]) -> Result<ArrayRef> {
    let array: ArrayRef = match rel_type {
        RelDataType::Scalar(DataType::Bool) => Arc::new(BooleanArray::from(
            convert(cells, DataType::Bool, Value::as_bool)?,
        )),
        RelDataType::Scalar(DataType::Int32) => Arc::new(Int32Array::from(convert(
            cells,
            DataType::Int32,
            |v| match v {
                Value::Int32(i) => Some(*i),
                _ => None,
            },
        )?)),
        RelDataType::Scalar(DataType::Int64) => Arc::new(Int64Array::from(convert(
            cells,
            DataType::Int64,
            Value::as_int64,
        )?)),
        RelDataType::Scalar(DataType::Float64) => Arc::new(Float64Array::from(convert(
            cells,
            DataType::Float64,
            Value::as_float64,
        )?)),
        RelDataType::Scalar(DataType::String) => Arc::new(StringArray::from(convert(
            cells,
            DataType::String,
            |v| v.as_string().map(str::to_string),
        )?)),
        RelDataType::Struct(_) | RelDataType::Collection(_) | RelDataType::Any => {
            Arc::new(StringArray::from(
                cells
                    .iter()
                    .map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect::<Vec<_>>(),
            ))
        }
    };
    Ok(array)
}

/// Extracts one typed cell per value; nulls stay null, anything else must
/// match `expected`.
fn convert<T>(
    cells: &[&Value],
    expected: DataType,
    extract: impl Fn(&Value) -> Option<T>,
) -> Result<Vec<Option<T>>> {
    cells
        .iter()
        .map(|v| {
            if v.is_null() {
                return Ok(None);
            }
            extract(*v).map(Some).ok_or_else(|| HostSchemaError::TypeError {
                expected: expected.name().to_string(),
                actual: v.runtime_type_name(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;

    use super::*;
    use crate::types::RelField;

    #[test]
    fn test_scalar_column() {
        let row_type = RelDataType::Scalar(DataType::Int32);
        let schema = Arc::new(row_type_to_arrow("nums", &row_type));
        let rows = vec![Value::Int32(3), Value::Null, Value::Int32(2)];
        let batch = values_to_batch(schema, &row_type, &rows).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.schema().field(0).name(), "nums");
        let col = batch.column(0).as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(col.value(0), 3);
        assert!(col.is_null(1));
    }

    #[test]
    fn test_struct_columns() {
        let row_type = RelDataType::Struct(vec![
            RelField {
                name: "id".into(),
                data_type: RelDataType::Scalar(DataType::Int64),
            },
            RelField {
                name: "name".into(),
                data_type: RelDataType::Scalar(DataType::String),
            },
        ]);
        let schema = Arc::new(row_type_to_arrow("people", &row_type));
        let rows = vec![
            Value::record(vec![Value::Int32(1), Value::from("Ann")]),
            Value::record(vec![Value::Int64(2), Value::from("Bo")]),
        ];
        let batch = values_to_batch(schema, &row_type, &rows).unwrap();
        assert_eq!(batch.num_columns(), 2);
        let ids = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.value(0), 1);
        let names = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(1), "Bo");
    }

    #[test]
    fn test_type_mismatch() {
        let row_type = RelDataType::Scalar(DataType::Bool);
        let schema = Arc::new(row_type_to_arrow("flags", &row_type));
        let err = values_to_batch(schema, &row_type, &[Value::from("yes")]).unwrap_err();
        assert!(matches!(err, HostSchemaError::TypeError { .. }));
    }

    #[test]
    fn test_any_rendered_as_string() {
        let row_type = RelDataType::Any;
        let schema = Arc::new(row_type_to_arrow("names", &row_type));
        let batch =
            values_to_batch(schema, &row_type, &[Value::from("a"), Value::Int64(5)]).unwrap();
        let col = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(col.value(0), "a");
        assert_eq!(col.value(1), "5");
    }
}

//! Value and `DataType` definitions for host data.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Supported scalar data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
}

impl DataType {
    /// Returns the SQL-style name of the data type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "BOOL",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Float64 => "FLOAT64",
            DataType::String => "STRING",
        }
    }

    /// Converts to an Arrow data type.
    #[must_use]
    pub fn to_arrow(&self) -> arrow::datatypes::DataType {
        match self {
            DataType::Bool => arrow::datatypes::DataType::Boolean,
            DataType::Int32 => arrow::datatypes::DataType::Int32,
            DataType::Int64 => arrow::datatypes::DataType::Int64,
            DataType::Float64 => arrow::datatypes::DataType::Float64,
            DataType::String => arrow::datatypes::DataType::Utf8,
        }
    }
}

/// A sequence source that can hand out any number of independent passes.
///
/// Whether a second pass observes the same elements as the first is up to
/// the implementation.
pub trait HostIterable: fmt::Debug + Send + Sync {
    /// Name of the runtime collection type, used in diagnostics.
    fn type_name(&self) -> &str {
        "Iterable"
    }

    /// Starts a new pass over the elements.
    fn iterate(self: Arc<Self>) -> Box<dyn Iterator<Item = Value> + Send>;
}

/// Stock iterable backed by an owned vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList(pub Vec<Value>);

impl HostIterable for ValueList {
    fn type_name(&self) -> &str {
        "List"
    }

    fn iterate(self: Arc<Self>) -> Box<dyn Iterator<Item = Value> + Send> {
        Box::new((0..self.0.len()).map(move |i| self.0[i].clone()))
    }
}

/// Unboxed array of a primitive element type.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveArray {
    Bool(Arc<[bool]>),
    Int32(Arc<[i32]>),
    Int64(Arc<[i64]>),
    Float64(Arc<[f64]>),
}

impl PrimitiveArray {
    /// Returns the runtime class name, e.g. `int[]`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveArray::Bool(_) => "boolean[]",
            PrimitiveArray::Int32(_) => "int[]",
            PrimitiveArray::Int64(_) => "long[]",
            PrimitiveArray::Float64(_) => "double[]",
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            PrimitiveArray::Bool(a) => a.len(),
            PrimitiveArray::Int32(a) => a.len(),
            PrimitiveArray::Int64(a) => a.len(),
            PrimitiveArray::Float64(a) => a.len(),
        }
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime value read from a host field or returned by a host method.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer value.
    Int32(i32),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit floating point value.
    Float64(f64),
    /// String value.
    String(String),
    /// Positional record; field names live in the declared `RecordType`.
    Record(Arc<[Value]>),
    /// Array of reference-typed elements.
    Array(Arc<[Value]>),
    /// Array of unboxed primitive elements.
    PrimitiveArray(PrimitiveArray),
    /// Any iterable collection.
    Iterable(Arc<dyn HostIterable>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Record(a), Value::Record(b)) | (Value::Array(a), Value::Array(b)) => a == b,
            (Value::PrimitiveArray(a), Value::PrimitiveArray(b)) => a == b,
            // Iterables compare by identity
            (Value::Iterable(a), Value::Iterable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Creates a reference array from owned elements.
    #[must_use]
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(values.into())
    }

    /// Creates a record from positional field values.
    #[must_use]
    pub fn record(values: Vec<Value>) -> Self {
        Value::Record(values.into())
    }

    /// Creates an iterable list from owned elements.
    #[must_use]
    pub fn list(values: Vec<Value>) -> Self {
        Value::Iterable(Arc::new(ValueList(values)))
    }

    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the runtime type name, used in diagnostics.
    #[must_use]
    pub fn runtime_type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Int32(_) => "Integer".to_string(),
            Value::Int64(_) => "Long".to_string(),
            Value::Float64(_) => "Double".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Record(_) => "Record".to_string(),
            Value::Array(_) => "Object[]".to_string(),
            Value::PrimitiveArray(a) => a.type_name().to_string(),
            Value::Iterable(it) => it.type_name().to_string(),
        }
    }

    /// Attempts to extract an i64 value, widening `Int32`.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Int32(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value.
    #[must_use]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to extract a bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the positional fields of a record.
    #[must_use]
    pub fn as_record(&self) -> Option<&[Value]> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float64(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Record(fields) => {
                write!(f, "{{")?;
                write_joined(f, fields)?;
                write!(f, "}}")
            }
            Value::Array(values) => {
                write!(f, "[")?;
                write_joined(f, values)?;
                write!(f, "]")
            }
            Value::PrimitiveArray(a) => write!(f, "{}(len={})", a.type_name(), a.len()),
            Value::Iterable(it) => write!(f, "{}@{:p}", it.type_name(), Arc::as_ptr(it)),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_type_names() {
        assert_eq!(Value::array(vec![]).runtime_type_name(), "Object[]");
        assert_eq!(
            Value::PrimitiveArray(PrimitiveArray::Int32(vec![1, 2].into())).runtime_type_name(),
            "int[]"
        );
        assert_eq!(Value::list(vec![]).runtime_type_name(), "List");
        assert_eq!(Value::Int64(1).runtime_type_name(), "Long");
    }

    #[test]
    fn test_iterables_compare_by_identity() {
        let a = Value::list(vec![Value::Int64(1)]);
        let b = Value::list(vec![Value::Int64(1)]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_value_list_restarts() {
        let list = Arc::new(ValueList(vec![Value::from("a"), Value::from("b")]));
        let first: Vec<Value> = list.clone().iterate().collect();
        let second: Vec<Value> = list.iterate().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_display_record() {
        let rec = Value::record(vec![Value::Int32(10), Value::from("Sales")]);
        assert_eq!(rec.to_string(), "{10, \"Sales\"}");
    }
}

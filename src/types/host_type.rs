//! Declared (static) types of host members.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Declared type of a host field, method parameter or method result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    /// Primitive boolean.
    Bool,
    /// Primitive 32-bit integer.
    Int32,
    /// Primitive 64-bit integer.
    Int64,
    /// Primitive 64-bit float.
    Float64,
    /// String reference.
    String,
    /// The opaque universal object type.
    Object,
    /// Named record type with ordered fields.
    Record(RecordType),
    /// Array with the given component type.
    Array(Box<HostType>),
    /// Any type with the iterable capability; the name is the collection type.
    Iterable(String),
    /// No value (method returning nothing).
    Unit,
}

impl HostType {
    /// Creates an array type over `component`.
    #[must_use]
    pub fn array(component: HostType) -> Self {
        HostType::Array(Box::new(component))
    }

    /// Creates an iterable type with the given collection name.
    #[must_use]
    pub fn iterable(name: impl Into<String>) -> Self {
        HostType::Iterable(name.into())
    }

    /// Returns true for unboxed primitive types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            HostType::Bool | HostType::Int32 | HostType::Int64 | HostType::Float64
        )
    }

    /// Returns true if `value` may be passed where this type is declared.
    ///
    /// Integers widen to `long` and `double`; `null` is accepted by
    /// reference types only.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (HostType::Unit, _) => false,
            (declared, Value::Null) => !declared.is_primitive(),
            (HostType::Object, _)
            | (HostType::Bool, Value::Bool(_))
            | (HostType::Int32, Value::Int32(_))
            | (HostType::Int64, Value::Int32(_) | Value::Int64(_))
            | (HostType::Float64, Value::Int32(_) | Value::Int64(_) | Value::Float64(_))
            | (HostType::String, Value::String(_))
            | (HostType::Record(_), Value::Record(_))
            | (HostType::Array(_), Value::Array(_) | Value::PrimitiveArray(_))
            | (HostType::Iterable(_), Value::Iterable(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Bool => write!(f, "boolean"),
            HostType::Int32 => write!(f, "int"),
            HostType::Int64 => write!(f, "long"),
            HostType::Float64 => write!(f, "double"),
            HostType::String => write!(f, "String"),
            HostType::Object => write!(f, "Object"),
            HostType::Record(record) => write!(f, "{}", record.name),
            HostType::Array(component) => write!(f, "{component}[]"),
            HostType::Iterable(name) => write!(f, "{name}"),
            HostType::Unit => write!(f, "void"),
        }
    }
}

/// Named record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType {
    /// Type name.
    pub name: String,
    /// Ordered field names and types.
    pub fields: Vec<(String, HostType)>,
}

impl RecordType {
    /// Creates a new record type.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<(&str, HostType)>) -> Self {
        RecordType {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(n, t)| (n.to_string(), t))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_classification() {
        assert!(HostType::Int32.is_primitive());
        assert!(!HostType::String.is_primitive());
        assert!(!HostType::array(HostType::Int32).is_primitive());
    }

    #[test]
    fn test_display() {
        assert_eq!(HostType::array(HostType::Int32).to_string(), "int[]");
        assert_eq!(HostType::iterable("List").to_string(), "List");
    }

    #[test]
    fn test_accepts_arguments() {
        assert!(HostType::Int32.accepts(&Value::Int32(1)));
        assert!(!HostType::Int32.accepts(&Value::from("1")));
        assert!(!HostType::Int32.accepts(&Value::Int64(1)));
        assert!(HostType::Int64.accepts(&Value::Int32(1)));
        assert!(HostType::Float64.accepts(&Value::Int64(1)));
        assert!(HostType::String.accepts(&Value::Null));
        assert!(!HostType::Int64.accepts(&Value::Null));
        assert!(HostType::Object.accepts(&Value::Float64(0.5)));
        assert!(HostType::array(HostType::String).accepts(&Value::array(vec![])));
        assert!(!HostType::Unit.accepts(&Value::Null));
    }
}

//! Relational types and the factory that derives them from host types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::host_type::HostType;
use super::value::DataType;

/// Relational type as seen by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelDataType {
    /// Scalar column type.
    Scalar(DataType),
    /// Row of named fields.
    Struct(Vec<RelField>),
    /// Multiset of elements.
    Collection(Box<RelDataType>),
    /// Opaque value with no relational structure.
    Any,
}

/// A named field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelField {
    /// Field name.
    pub name: String,
    /// Field type.
    pub data_type: RelDataType,
}

impl RelDataType {
    /// Returns the struct fields, if this is a struct type.
    #[must_use]
    pub fn fields(&self) -> Option<&[RelField]> {
        match self {
            RelDataType::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for RelDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelDataType::Scalar(dt) => write!(f, "{}", dt.name()),
            RelDataType::Struct(fields) => {
                write!(f, "RecordType(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", field.data_type, field.name)?;
                }
                write!(f, ")")
            }
            RelDataType::Collection(elem) => write!(f, "{elem} MULTISET"),
            RelDataType::Any => write!(f, "ANY"),
        }
    }
}

/// Converts declared host types into relational types.
pub trait TypeFactory: fmt::Debug + Send + Sync {
    /// Creates the relational type for a declared host type.
    fn create_type(&self, host_type: &HostType) -> RelDataType;
}

/// Stock type factory.
///
/// Records become structs, arrays and iterables become collections, and
/// types with no relational counterpart become `ANY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostTypeFactory;

impl TypeFactory for HostTypeFactory {
    fn create_type(&self, host_type: &HostType) -> RelDataType {
        match host_type {
            HostType::Bool => RelDataType::Scalar(DataType::Bool),
            HostType::Int32 => RelDataType::Scalar(DataType::Int32),
            HostType::Int64 => RelDataType::Scalar(DataType::Int64),
            HostType::Float64 => RelDataType::Scalar(DataType::Float64),
            HostType::String => RelDataType::Scalar(DataType::String),
            HostType::Record(record) => RelDataType::Struct(
                record
                    .fields
                    .iter()
                    .map(|(name, ty)| RelField {
                        name: name.clone(),
                        data_type: self.create_type(ty),
                    })
                    .collect(),
            ),
            HostType::Array(component) => {
                RelDataType::Collection(Box::new(self.create_type(component)))
            }
            HostType::Iterable(_) => RelDataType::Collection(Box::new(RelDataType::Any)),
            HostType::Object | HostType::Unit => RelDataType::Any,
        }
    }
}

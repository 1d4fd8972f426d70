//! Relation and relation-function contracts exposed to the query engine.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::enumerable::Enumerator;
use crate::error::Result;
use crate::expression::{Expression, QueryProvider};
use crate::types::{HostType, RelDataType, TypeFactory, Value};

/// A named, typed, enumerable data source.
pub trait Table: fmt::Debug + fmt::Display + Send + Sync {
    /// Returns the element type, or `None` if the source is not a collection.
    fn element_type(&self) -> Option<&HostType>;

    /// Returns the expression that re-derives this relation from the schema root.
    fn expression(&self) -> &Expression;

    /// Returns the provider able to execute [`Table::expression`].
    fn query_provider(&self) -> &Arc<dyn QueryProvider>;

    /// Starts a new enumeration over the current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or enumerated.
    fn enumerator(&self) -> Result<Enumerator>;

    /// Returns the relational type of one element.
    fn row_type(&self, factory: &dyn TypeFactory) -> RelDataType {
        self.element_type()
            .map_or(RelDataType::Any, |ty| factory.create_type(ty))
    }
}

/// A declared parameter of a relation function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Zero-based position.
    pub ordinal: usize,
    /// Synthetic name, `arg<ordinal>`.
    pub name: String,
    /// Relational type of the declared parameter type.
    pub rel_type: RelDataType,
}

impl Parameter {
    /// Creates the parameter at `ordinal`.
    #[must_use]
    pub fn new(ordinal: usize, rel_type: RelDataType) -> Self {
        Parameter {
            ordinal,
            name: format!("arg{ordinal}"),
            rel_type,
        }
    }
}

/// A parameterized generator of relations.
pub trait TableFunction: fmt::Debug + fmt::Display + Send + Sync {
    /// Returns the declared parameters, in order.
    fn parameters(&self) -> &[Parameter];

    /// Returns the element type of the produced relations.
    fn element_type(&self) -> Option<&HostType>;

    /// Produces a relation for the given arguments.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` for a wrong argument count, `ArgumentType`
    /// for an argument the declared parameter type rejects, and the host's
    /// invocation error if producing the relation fails.
    fn apply(&self, arguments: Vec<Value>) -> Result<Arc<dyn Table>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn test_parameter_names() {
        let p = Parameter::new(2, RelDataType::Scalar(DataType::Int32));
        assert_eq!(p.name, "arg2");
        assert_eq!(p.ordinal, 2);
    }
}

//! Symbolic reference expressions.
//!
//! Relations carry an expression describing how to re-derive their data
//! from the schema's root. Downstream compiled consumers re-emit these
//! trees instead of calling back into the catalog.

mod evaluator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HostSchemaError, Result};
use crate::types::{HostType, Value};

pub use evaluator::{ExpressionEvaluator, QueryProvider};

/// Identity of a host field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Declaring host type.
    pub class: String,
    /// Field name.
    pub name: String,
    /// Slot in the declaring type's descriptor table.
    pub slot: usize,
    /// Declared field type.
    pub declared_type: HostType,
}

/// Identity of a host method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Declaring host type.
    pub class: String,
    /// Method name.
    pub name: String,
    /// Slot in the declaring type's descriptor table.
    pub slot: usize,
    /// Declared parameter types.
    pub parameter_types: Vec<HostType>,
    /// Declared return type.
    pub return_type: HostType,
}

impl MethodRef {
    /// Returns the qualified signature, e.g. `Hr.find(int)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.parameter_types.iter().map(ToString::to_string).collect();
        format!("{}.{}({})", self.class, self.name, params.join(", "))
    }

    /// Checks `arguments` against the declared parameter types.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` for a wrong argument count and
    /// `ArgumentType` for the first argument the declared type rejects.
    pub fn check_arguments(&self, arguments: &[Value]) -> Result<()> {
        if arguments.len() != self.parameter_types.len() {
            return Err(HostSchemaError::ArityMismatch {
                function: self.signature(),
                expected: self.parameter_types.len(),
                actual: arguments.len(),
            });
        }
        for (ordinal, (declared, argument)) in
            self.parameter_types.iter().zip(arguments).enumerate()
        {
            if !declared.accepts(argument) {
                return Err(HostSchemaError::ArgumentType {
                    function: self.signature(),
                    ordinal,
                    expected: declared.to_string(),
                    actual: argument.runtime_type_name(),
                });
            }
        }
        Ok(())
    }
}

/// Expression tree rooted at a named schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A named root, bound to a host object at evaluation time.
    Root(String),
    /// Literal constant.
    Constant(Value),
    /// Field access on the target.
    Field {
        target: Box<Expression>,
        field: FieldRef,
    },
    /// Method call on the target.
    Call {
        target: Box<Expression>,
        method: MethodRef,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    /// Creates a root expression.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Expression::Root(name.into())
    }

    /// Creates a literal constant expression.
    #[must_use]
    pub fn constant(value: Value) -> Self {
        Expression::Constant(value)
    }

    /// Creates a field access expression.
    #[must_use]
    pub fn field(target: Expression, field: FieldRef) -> Self {
        Expression::Field {
            target: Box::new(target),
            field,
        }
    }

    /// Creates a method call expression.
    #[must_use]
    pub fn call(target: Expression, method: MethodRef, arguments: Vec<Expression>) -> Self {
        Expression::Call {
            target: Box::new(target),
            method,
            arguments,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Root(name) => write!(f, "{name}"),
            Expression::Constant(value) => write!(f, "{value}"),
            Expression::Field { target, field } => write!(f, "{target}.{}", field.name),
            Expression::Call {
                target,
                method,
                arguments,
            } => {
                write!(f, "{target}.{}(", method.name)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_call() {
        let method = MethodRef {
            class: "Hr".into(),
            name: "employees_in".into(),
            slot: 0,
            parameter_types: vec![HostType::Int32],
            return_type: HostType::iterable("List"),
        };
        let expr = Expression::call(
            Expression::root("hr"),
            method,
            vec![Expression::constant(Value::Int32(10))],
        );
        assert_eq!(expr.to_string(), "hr.employees_in(10)");
    }

    #[test]
    fn test_check_arguments() {
        let method = MethodRef {
            class: "Hr".into(),
            name: "find".into(),
            slot: 0,
            parameter_types: vec![HostType::Int32],
            return_type: HostType::iterable("List"),
        };
        assert_eq!(method.signature(), "Hr.find(int)");
        assert!(method.check_arguments(&[Value::Int32(10)]).is_ok());
        assert!(matches!(
            method.check_arguments(&[]),
            Err(HostSchemaError::ArityMismatch { expected: 1, actual: 0, .. })
        ));
        match method.check_arguments(&[Value::from("ten")]) {
            Err(HostSchemaError::ArgumentType {
                ordinal,
                expected,
                actual,
                ..
            }) => {
                assert_eq!(ordinal, 0);
                assert_eq!(expected, "int");
                assert_eq!(actual, "String");
            }
            other => panic!("expected ArgumentType, got {other:?}"),
        }
    }
}

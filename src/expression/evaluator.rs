//! Interpreter for reference expressions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::enumerable::{to_enumerator, Enumerator};
use crate::error::{HostSchemaError, Result};
use crate::host::HostObject;
use crate::types::Value;

use super::Expression;

/// Executes reference expressions on behalf of the query engine.
pub trait QueryProvider: fmt::Debug + Send + Sync {
    /// Evaluates `expression` and enumerates the resulting collection.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails or the result is not enumerable.
    fn execute(&self, expression: &Expression) -> Result<Enumerator>;
}

/// Stock query provider that interprets expression trees directly.
///
/// Roots are resolved through a binding table. Every evaluation re-reads
/// fields and re-invokes methods.
#[derive(Debug, Default)]
pub struct ExpressionEvaluator {
    roots: RwLock<HashMap<String, Arc<dyn HostObject>>>,
}

impl ExpressionEvaluator {
    /// Creates an evaluator with no roots bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a host object, replacing any earlier binding.
    pub fn bind(&self, name: impl Into<String>, host: Arc<dyn HostObject>) {
        let name = name.into();
        debug!("binding root '{name}' to {}", host.class_name());
        self.roots.write().insert(name, host);
    }

    /// Evaluates `expression` to a value.
    ///
    /// # Errors
    ///
    /// Returns `UnboundRoot` for unknown roots, `InvalidExpression` for trees
    /// that do not address a host member, `ArityMismatch` or `ArgumentType`
    /// for calls whose arguments do not fit the method, and the host's
    /// access errors.
    pub fn evaluate(&self, expression: &Expression) -> Result<Value> {
        match expression {
            Expression::Constant(value) => Ok(value.clone()),
            Expression::Root(name) => Err(HostSchemaError::InvalidExpression(format!(
                "root '{name}' denotes a host object, not a value"
            ))),
            Expression::Field { target, field } => {
                let host = self.resolve_host(target)?;
                Self::check_class(host.as_ref(), &field.class)?;
                host.read_field(field.slot)
            }
            Expression::Call {
                target,
                method,
                arguments,
            } => {
                let host = self.resolve_host(target)?;
                Self::check_class(host.as_ref(), &method.class)?;
                let args = arguments
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>>>()?;
                method.check_arguments(&args)?;
                host.invoke(method.slot, &args)
            }
        }
    }

    fn resolve_host(&self, target: &Expression) -> Result<Arc<dyn HostObject>> {
        match target {
            Expression::Root(name) => self
                .roots
                .read()
                .get(name)
                .cloned()
                .ok_or_else(|| HostSchemaError::UnboundRoot(name.clone())),
            other => Err(HostSchemaError::InvalidExpression(format!(
                "member target must be a root, got {other}"
            ))),
        }
    }

    fn check_class(host: &dyn HostObject, class: &str) -> Result<()> {
        if host.class_name() == class {
            Ok(())
        } else {
            Err(HostSchemaError::InvalidExpression(format!(
                "member of {class} applied to {}",
                host.class_name()
            )))
        }
    }
}

impl QueryProvider for ExpressionEvaluator {
    fn execute(&self, expression: &Expression) -> Result<Enumerator> {
        to_enumerator(self.evaluate(expression)?)
    }
}

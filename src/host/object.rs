//! Type-erased handles to host objects.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{AccessError, HostSchemaError, Result};
use crate::types::Value;

use super::class::HostClass;

/// A host type that can describe its own public surface.
pub trait Reflect: Send + Sync + Sized + 'static {
    /// Builds the descriptor table for this type.
    fn host_class() -> HostClass<Self>;
}

/// Type-erased access to a live host object, addressed by member slot.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Returns the host type name.
    fn class_name(&self) -> &str;

    /// Reads the field in `slot`.
    ///
    /// # Errors
    ///
    /// Returns `FieldAccess` if the host is gone or refuses the read.
    fn read_field(&self, slot: usize) -> Result<Value>;

    /// Invokes the method in `slot` with `args`.
    ///
    /// # Errors
    ///
    /// Returns `MethodInvocation` if the host is gone or the call fails.
    fn invoke(&self, slot: usize, args: &[Value]) -> Result<Value>;
}

/// Non-owning binding of a host object to its descriptor table.
///
/// The owner keeps the host alive; once it is dropped every access fails
/// with [`AccessError::HostDropped`].
pub struct BoundHost<T> {
    class: Arc<HostClass<T>>,
    target: Weak<T>,
}

impl<T> Clone for BoundHost<T> {
    fn clone(&self) -> Self {
        BoundHost {
            class: Arc::clone(&self.class),
            target: Weak::clone(&self.target),
        }
    }
}

impl<T> BoundHost<T> {
    /// Binds `target` to `class` without taking ownership.
    #[must_use]
    pub fn new(class: Arc<HostClass<T>>, target: &Arc<T>) -> Self {
        BoundHost {
            class,
            target: Arc::downgrade(target),
        }
    }

    /// Returns the descriptor table.
    #[must_use]
    pub fn class(&self) -> &Arc<HostClass<T>> {
        &self.class
    }

    /// Upgrades to the live host, if its owner still holds it.
    #[must_use]
    pub fn target(&self) -> Option<Arc<T>> {
        self.target.upgrade()
    }

    fn field_error(&self, slot: usize, source: AccessError) -> HostSchemaError {
        HostSchemaError::FieldAccess {
            class: self.class.name().to_string(),
            field: self
                .class
                .field(slot)
                .map_or_else(|| format!("#{slot}"), |f| f.name.clone()),
            source,
        }
    }

    fn method_error(&self, slot: usize, source: AccessError) -> HostSchemaError {
        HostSchemaError::MethodInvocation {
            class: self.class.name().to_string(),
            method: self
                .class
                .method(slot)
                .map_or_else(|| format!("#{slot}"), |m| m.signature()),
            source,
        }
    }
}

impl<T> fmt::Debug for BoundHost<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHost")
            .field("class", &self.class.name())
            .field("alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

impl<T: Send + Sync> HostObject for BoundHost<T> {
    fn class_name(&self) -> &str {
        self.class.name()
    }

    fn read_field(&self, slot: usize) -> Result<Value> {
        let Some(field) = self.class.field(slot) else {
            return Err(HostSchemaError::InvalidExpression(format!(
                "{} has no field in slot {slot}",
                self.class.name()
            )));
        };
        let host = self
            .target
            .upgrade()
            .ok_or_else(|| self.field_error(slot, AccessError::HostDropped))?;
        field.get(&host).map_err(|e| self.field_error(slot, e))
    }

    fn invoke(&self, slot: usize, args: &[Value]) -> Result<Value> {
        let Some(method) = self.class.method(slot) else {
            return Err(HostSchemaError::InvalidExpression(format!(
                "{} has no method in slot {slot}",
                self.class.name()
            )));
        };
        let host = self
            .target
            .upgrade()
            .ok_or_else(|| self.method_error(slot, AccessError::HostDropped))?;
        method.invoke(&host, args).map_err(|e| self.method_error(slot, e))
    }
}

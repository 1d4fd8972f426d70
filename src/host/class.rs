//! Static member descriptor tables for host types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::types::{HostType, Value};

/// Reads a field from a host object.
pub type FieldGetter<T> = Arc<dyn Fn(&T) -> Result<Value, AccessError> + Send + Sync>;

/// Invokes a method on a host object.
pub type MethodInvoker<T> = Arc<dyn Fn(&T, &[Value]) -> Result<Value, AccessError> + Send + Sync>;

/// Accessibility of a host member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Accessible to the schema.
    #[default]
    Public,
    /// Hidden from the schema.
    Private,
}

/// Where a member is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeclaringType {
    /// Declared by the host type itself.
    #[default]
    Own,
    /// Inherited from the universal base type.
    Base,
}

/// Descriptor of a host field.
pub struct FieldDescriptor<T> {
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub declared_type: HostType,
    /// Field accessibility.
    pub visibility: Visibility,
    getter: FieldGetter<T>,
}

impl<T> FieldDescriptor<T> {
    /// Reads the current value of this field from `host`.
    ///
    /// # Errors
    ///
    /// Returns the host's access error if the read fails.
    pub fn get(&self, host: &T) -> Result<Value, AccessError> {
        (self.getter)(host)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Descriptor of a host method.
pub struct MethodDescriptor<T> {
    /// Method name.
    pub name: String,
    /// Declared parameter types, in order.
    pub parameter_types: Vec<HostType>,
    /// Declared return type.
    pub return_type: HostType,
    /// Method accessibility.
    pub visibility: Visibility,
    /// Declaring type.
    pub declared_by: DeclaringType,
    invoker: MethodInvoker<T>,
}

impl<T> MethodDescriptor<T> {
    /// Invokes this method on `host` with `args`.
    ///
    /// # Errors
    ///
    /// Returns the host's access error if the invocation fails.
    pub fn invoke(&self, host: &T, args: &[Value]) -> Result<Value, AccessError> {
        (self.invoker)(host, args)
    }

    /// Returns the signature, e.g. `names(int)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.parameter_types.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

impl<T> fmt::Debug for MethodDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("parameter_types", &self.parameter_types)
            .field("return_type", &self.return_type)
            .field("visibility", &self.visibility)
            .field("declared_by", &self.declared_by)
            .finish_non_exhaustive()
    }
}

/// Descriptor table for a host type `T`.
///
/// Built once through [`HostClass::builder`]; fields and methods keep
/// their registration order.
pub struct HostClass<T> {
    name: String,
    fields: Vec<FieldDescriptor<T>>,
    methods: Vec<MethodDescriptor<T>>,
}

impl<T> fmt::Debug for HostClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostClass")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

impl<T: Send + Sync + 'static> HostClass<T> {
    /// Starts building a descriptor table for the type named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> HostClassBuilder<T> {
        HostClassBuilder {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }
}

impl<T> HostClass<T> {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all fields, public or not.
    #[must_use]
    pub fn declared_fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Returns all methods, including the base-type ones.
    #[must_use]
    pub fn declared_methods(&self) -> &[MethodDescriptor<T>] {
        &self.methods
    }

    /// Iterates the public fields with their slot numbers.
    pub fn public_fields(&self) -> impl Iterator<Item = (usize, &FieldDescriptor<T>)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.visibility == Visibility::Public)
    }

    /// Iterates the public methods with their slot numbers.
    pub fn public_methods(&self) -> impl Iterator<Item = (usize, &MethodDescriptor<T>)> {
        self.methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.visibility == Visibility::Public)
    }

    /// Returns the field in `slot`.
    #[must_use]
    pub fn field(&self, slot: usize) -> Option<&FieldDescriptor<T>> {
        self.fields.get(slot)
    }

    /// Returns the method in `slot`.
    #[must_use]
    pub fn method(&self, slot: usize) -> Option<&MethodDescriptor<T>> {
        self.methods.get(slot)
    }
}

/// Builder for [`HostClass`].
pub struct HostClassBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor<T>>,
    methods: Vec<MethodDescriptor<T>>,
}

impl<T: Send + Sync + 'static> HostClassBuilder<T> {
    /// Registers a public field.
    #[must_use]
    pub fn field<F>(self, name: &str, declared_type: HostType, getter: F) -> Self
    where
        F: Fn(&T) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.add_field(name, declared_type, Visibility::Public, getter)
    }

    /// Registers a private field; it never reaches the schema.
    #[must_use]
    pub fn private_field<F>(self, name: &str, declared_type: HostType, getter: F) -> Self
    where
        F: Fn(&T) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.add_field(name, declared_type, Visibility::Private, getter)
    }

    /// Registers a public method.
    #[must_use]
    pub fn method<F>(
        self,
        name: &str,
        parameter_types: Vec<HostType>,
        return_type: HostType,
        invoker: F,
    ) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.add_method(
            name,
            parameter_types,
            return_type,
            Visibility::Public,
            DeclaringType::Own,
            Arc::new(invoker),
        )
    }

    /// Registers a private method; it never reaches the schema.
    #[must_use]
    pub fn private_method<F>(
        self,
        name: &str,
        parameter_types: Vec<HostType>,
        return_type: HostType,
        invoker: F,
    ) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.add_method(
            name,
            parameter_types,
            return_type,
            Visibility::Private,
            DeclaringType::Own,
            Arc::new(invoker),
        )
    }

    /// Finishes the table, appending the universal base-type methods.
    #[must_use]
    pub fn build(self) -> HostClass<T> {
        let class_name = self.name.clone();
        let to_string: MethodInvoker<T> = Arc::new(move |host: &T, _args: &[Value]| {
            Ok(Value::String(format!(
                "{class_name}@{:x}",
                host as *const T as usize
            )))
        });
        let hash_code: MethodInvoker<T> = Arc::new(|host: &T, _args: &[Value]| {
            Ok(Value::Int64(host as *const T as usize as i64))
        });

        self.add_method(
            "to_string",
            vec![],
            HostType::String,
            Visibility::Public,
            DeclaringType::Base,
            to_string,
        )
        .add_method(
            "hash_code",
            vec![],
            HostType::Int64,
            Visibility::Public,
            DeclaringType::Base,
            hash_code,
        )
        .finish()
    }

    fn add_field<F>(
        mut self,
        name: &str,
        declared_type: HostType,
        visibility: Visibility,
        getter: F,
    ) -> Self
    where
        F: Fn(&T) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            declared_type,
            visibility,
            getter: Arc::new(getter),
        });
        self
    }

    fn add_method(
        mut self,
        name: &str,
        parameter_types: Vec<HostType>,
        return_type: HostType,
        visibility: Visibility,
        declared_by: DeclaringType,
        invoker: MethodInvoker<T>,
    ) -> Self {
        self.methods.push(MethodDescriptor {
            name: name.to_string(),
            parameter_types,
            return_type,
            visibility,
            declared_by,
            invoker,
        });
        self
    }

    fn finish(self) -> HostClass<T> {
        HostClass {
            name: self.name,
            fields: self.fields,
            methods: self.methods,
        }
    }
}

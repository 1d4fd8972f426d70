//! Host object description.
//!
//! Host types publish their members through an explicit descriptor table
//! instead of runtime introspection:
//! - `HostClass` lists fields and methods with their declared types
//! - `BoundHost` pairs a table with a non-owning handle to one instance

mod class;
mod object;

pub use class::{
    DeclaringType, FieldDescriptor, FieldGetter, HostClass, HostClassBuilder, MethodDescriptor,
    MethodInvoker, Visibility,
};
pub use object::{BoundHost, HostObject, Reflect};

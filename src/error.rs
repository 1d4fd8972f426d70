//! Error types for host schema operations.

use thiserror::Error;

/// Result type alias using [`HostSchemaError`].
pub type Result<T> = std::result::Result<T, HostSchemaError>;

/// Failure raised by a host accessor while reading a field or invoking a method.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The host refused access to the member.
    #[error("access denied: {0}")]
    Denied(String),

    /// The member body itself failed.
    #[error("member raised: {0}")]
    Raised(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The host object was dropped by its owner.
    #[error("host object is no longer alive")]
    HostDropped,
}

impl AccessError {
    /// Wraps an arbitrary error raised by the member body.
    pub fn raised<E>(cause: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        AccessError::Raised(cause.into())
    }
}

/// Error types for host schema operations.
#[derive(Debug, Error)]
pub enum HostSchemaError {
    // ==================== Enumeration Errors ====================
    /// The value is an array of primitive elements; no adapter exists.
    #[error("Unsupported conversion: {runtime_type} cannot be enumerated (primitive arrays have no adapter)")]
    UnsupportedConversion { runtime_type: String },

    /// The value is neither a reference array nor iterable.
    #[error("Cannot convert {runtime_type} into an enumerable")]
    NotEnumerable { runtime_type: String },

    // ==================== Access Errors ====================
    /// Reading a host field failed.
    #[error("Error while accessing field {class}.{field}")]
    FieldAccess {
        class: String,
        field: String,
        #[source]
        source: AccessError,
    },

    /// Invoking a host method failed.
    #[error("Error while invoking method {class}.{method}")]
    MethodInvocation {
        class: String,
        method: String,
        #[source]
        source: AccessError,
    },

    // ==================== Catalog Errors ====================
    /// Two relations were registered under the same name.
    #[error("Duplicate table: '{0}' already exists")]
    DuplicateTable(String),

    /// A table function was applied to the wrong number of arguments.
    #[error("Arity mismatch: {function} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// An argument does not match the declared parameter type.
    #[error("Argument type mismatch: {function} argument {ordinal} expects {expected}, got {actual}")]
    ArgumentType {
        function: String,
        ordinal: usize,
        expected: String,
        actual: String,
    },

    /// Catalog description persistence errors.
    #[error("Catalog error: {0}")]
    CatalogError(String),

    // ==================== Expression Errors ====================
    /// A root expression has no host object bound to it.
    #[error("Unbound root expression: {0}")]
    UnboundRoot(String),

    /// The expression tree cannot be evaluated.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    // ==================== Query Engine Errors ====================
    /// Type mismatch while converting values to columns.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// General execution errors.
    #[error("Execution error: {0}")]
    ExecutionError(String),
}

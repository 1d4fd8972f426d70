//! hostschema - relations over live in-memory objects
//!
//! Binds the public members of a host object into a catalog a relational
//! query engine can consume:
//! - every public array or iterable field becomes a relation
//! - every public method becomes a relation function (overloads allowed)
//!
//! Each relation can be enumerated directly and also carries a reference
//! expression that compiled consumers re-emit to reach the same data.
//!
//! ```ignore
//! let hr = Arc::new(Hr::sample());
//! let schema = ReflectiveSchema::new(
//!     Arc::new(ExpressionEvaluator::new()),
//!     &hr,
//!     Arc::new(HostTypeFactory),
//!     Expression::root("hr"),
//! )?;
//! let emps = schema.get_table("emps").unwrap();
//! for row in emps.enumerator()? {
//!     println!("{row}");
//! }
//! ```

pub mod catalog;
pub mod datafusion;
pub mod enumerable;
pub mod error;
pub mod expression;
pub mod host;
pub mod types;

pub use catalog::{
    DuplicateFieldPolicy, MapSchema, Parameter, ReflectiveSchema, Schema, SchemaConfig,
    SchemaDescription, Table, TableFunction,
};
pub use enumerable::{deduce_element_type, to_enumerator, Enumerator};
pub use error::{AccessError, HostSchemaError, Result};
pub use expression::{Expression, ExpressionEvaluator, FieldRef, MethodRef, QueryProvider};
pub use host::{BoundHost, HostClass, HostObject, Reflect};
pub use types::{
    DataType, HostIterable, HostType, HostTypeFactory, PrimitiveArray, RecordType, RelDataType,
    TypeFactory, Value,
};

//! Catalog of relations and relation functions.

mod reflective;
mod schema;
mod table;

pub use reflective::ReflectiveSchema;
pub use schema::{
    DuplicateFieldPolicy, FunctionDescription, MapSchema, Schema, SchemaConfig,
    SchemaDescription, TableDescription,
};
pub use table::{Parameter, Table, TableFunction};

//! DataFusion integration module.
//!
//! This module exposes host relations to Apache DataFusion:
//! - TableProvider over any catalog relation
//! - Conversion of enumerated values into Arrow record batches

pub mod record_batch;
pub mod table_provider;

pub use record_batch::{reltype_to_arrow, row_type_to_arrow, values_to_batch};
pub use table_provider::{register_schema, RelationTableProvider};

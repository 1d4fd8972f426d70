//! Type system for host data.

mod host_type;
mod rel_type;
mod value;

pub use host_type::{HostType, RecordType};
pub use rel_type::{HostTypeFactory, RelDataType, RelField, TypeFactory};
pub use value::{DataType, HostIterable, PrimitiveArray, Value, ValueList};

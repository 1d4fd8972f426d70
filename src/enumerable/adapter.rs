//! Conversion of runtime values into enumerators.

use std::sync::Arc;

use log::trace;

use crate::error::{HostSchemaError, Result};
use crate::types::Value;

use super::Enumerator;

/// Converts a runtime value into an enumerator over its elements.
///
/// Reference arrays are viewed element by element; every call starts a
/// fresh pass. Iterables start a new pass of their own; whether that pass
/// can be repeated is up to the iterable.
///
/// # Errors
///
/// - `UnsupportedConversion` for arrays of primitive elements
/// - `NotEnumerable` for anything that is neither an array nor iterable
pub fn to_enumerator(value: Value) -> Result<Enumerator> {
    match value {
        Value::Array(elements) => {
            trace!("enumerating Object[] of {} elements", elements.len());
            Ok(array_enumerator(elements))
        }
        Value::PrimitiveArray(array) => Err(HostSchemaError::UnsupportedConversion {
            runtime_type: array.type_name().to_string(),
        }),
        Value::Iterable(iterable) => {
            trace!("enumerating {}", iterable.type_name());
            Ok(Enumerator::new(iterable.iterate()))
        }
        other => Err(HostSchemaError::NotEnumerable {
            runtime_type: other.runtime_type_name(),
        }),
    }
}

fn array_enumerator(elements: Arc<[Value]>) -> Enumerator {
    Enumerator::new((0..elements.len()).map(move |i| elements[i].clone()))
}

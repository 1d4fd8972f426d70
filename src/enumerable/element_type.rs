//! Element-type deduction from declared member types.

use crate::types::HostType;

/// Deduces the element type of a collection-shaped declared type.
///
/// Arrays yield their component type. Iterables yield the opaque object
/// type; generic parameters are not inspected. Anything else is not a
/// collection and yields `None`. Mirrors the shapes accepted by
/// [`to_enumerator`](super::to_enumerator).
#[must_use]
pub fn deduce_element_type(declared: &HostType) -> Option<HostType> {
    match declared {
        HostType::Array(component) => Some((**component).clone()),
        HostType::Iterable(_) => Some(HostType::Object),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordType;

    #[test]
    fn test_array_yields_component() {
        let emp = HostType::Record(RecordType::new("Employee", vec![("id", HostType::Int32)]));
        assert_eq!(
            deduce_element_type(&HostType::array(emp.clone())),
            Some(emp)
        );
        assert_eq!(
            deduce_element_type(&HostType::array(HostType::Int32)),
            Some(HostType::Int32)
        );
    }

    #[test]
    fn test_iterable_yields_object() {
        assert_eq!(
            deduce_element_type(&HostType::iterable("List")),
            Some(HostType::Object)
        );
    }

    #[test]
    fn test_scalars_are_not_collections() {
        assert_eq!(deduce_element_type(&HostType::String), None);
        assert_eq!(deduce_element_type(&HostType::Int64), None);
        assert_eq!(deduce_element_type(&HostType::Object), None);
        assert_eq!(deduce_element_type(&HostType::Unit), None);
    }
}

//! Schema exposing the public fields and methods of a host object.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::enumerable::{deduce_element_type, to_enumerator, Enumerator};
use crate::error::Result;
use crate::expression::{Expression, FieldRef, MethodRef, QueryProvider};
use crate::host::{BoundHost, DeclaringType, HostClass, HostObject, Reflect};
use crate::types::{HostType, TypeFactory, Value};

use super::schema::{MapSchema, Schema, SchemaConfig, SchemaDescription};
use super::table::{Parameter, Table, TableFunction};

/// Schema over one host object.
///
/// Every public field of array or iterable type becomes a relation; every
/// public method not inherited from the base type becomes a relation
/// function. The catalog is built once, at construction.
#[derive(Debug)]
pub struct ReflectiveSchema {
    base: MapSchema,
    host: Arc<dyn HostObject>,
}

impl ReflectiveSchema {
    /// Creates a schema over `target` using its own descriptor table.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTable` if two public fields share a name.
    pub fn new<T: Reflect>(
        query_provider: Arc<dyn QueryProvider>,
        target: &Arc<T>,
        type_factory: Arc<dyn TypeFactory>,
        expression: Expression,
    ) -> Result<Self> {
        Self::with_class(
            query_provider,
            target,
            T::host_class(),
            type_factory,
            expression,
            SchemaConfig::default(),
        )
    }

    /// Creates a schema over `target` using an explicit descriptor table.
    ///
    /// The schema holds `target` weakly; its owner controls its lifetime.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTable` if two public fields share a name and the
    /// configuration rejects duplicates.
    pub fn with_class<T: Send + Sync + 'static>(
        query_provider: Arc<dyn QueryProvider>,
        target: &Arc<T>,
        class: HostClass<T>,
        type_factory: Arc<dyn TypeFactory>,
        expression: Expression,
        config: SchemaConfig,
    ) -> Result<Self> {
        let class = Arc::new(class);
        let host: Arc<dyn HostObject> = Arc::new(BoundHost::new(Arc::clone(&class), target));
        let mut base = MapSchema::new(query_provider, type_factory, expression, config);
        debug!("building schema {} over {}", base.expression(), class.name());

        for (slot, field) in class.public_fields() {
            let Some(element_type) = deduce_element_type(&field.declared_type) else {
                debug!(
                    "skipping field {}.{}: {} is not a collection",
                    class.name(),
                    field.name,
                    field.declared_type
                );
                continue;
            };
            let field_ref = FieldRef {
                class: class.name().to_string(),
                name: field.name.clone(),
                slot,
                declared_type: field.declared_type.clone(),
            };
            let table = FieldTable {
                host: Arc::clone(&host),
                expression: Expression::field(base.expression().clone(), field_ref.clone()),
                query_provider: Arc::clone(base.query_provider()),
                field: field_ref,
                element_type,
            };
            base.add_table(&field.name, Arc::new(table))?;
        }

        for (slot, method) in class.public_methods() {
            if method.declared_by == DeclaringType::Base {
                continue;
            }
            let parameters = method
                .parameter_types
                .iter()
                .enumerate()
                .map(|(ordinal, ty)| Parameter::new(ordinal, base.type_factory().create_type(ty)))
                .collect();
            let function = MethodTableFunction {
                host: Arc::clone(&host),
                method: MethodRef {
                    class: class.name().to_string(),
                    name: method.name.clone(),
                    slot,
                    parameter_types: method.parameter_types.clone(),
                    return_type: method.return_type.clone(),
                },
                element_type: deduce_element_type(&method.return_type),
                parameters,
                schema_expression: base.expression().clone(),
                query_provider: Arc::clone(base.query_provider()),
            };
            base.add_function(&method.name, Arc::new(function));
        }

        Ok(ReflectiveSchema { base, host })
    }

    /// Returns the type-erased host handle, e.g. for binding the schema
    /// root in an [`ExpressionEvaluator`](crate::expression::ExpressionEvaluator).
    #[must_use]
    pub fn host_object(&self) -> Arc<dyn HostObject> {
        Arc::clone(&self.host)
    }

    /// Returns the host type name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.host.class_name()
    }

    /// Summarizes the catalog.
    #[must_use]
    pub fn describe(&self) -> SchemaDescription {
        self.base.describe()
    }
}

impl Schema for ReflectiveSchema {
    fn expression(&self) -> &Expression {
        self.base.expression()
    }

    fn query_provider(&self) -> &Arc<dyn QueryProvider> {
        self.base.query_provider()
    }

    fn type_factory(&self) -> &Arc<dyn TypeFactory> {
        self.base.type_factory()
    }

    fn get_table(&self, name: &str) -> Option<Arc<dyn Table>> {
        self.base.get_table(name)
    }

    fn get_table_functions(&self, name: &str) -> &[Arc<dyn TableFunction>] {
        self.base.get_table_functions(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.base.table_names()
    }

    fn function_names(&self) -> Vec<&str> {
        self.base.function_names()
    }
}

/// Relation over a host field; every enumeration re-reads the field.
#[derive(Debug)]
struct FieldTable {
    host: Arc<dyn HostObject>,
    field: FieldRef,
    element_type: HostType,
    expression: Expression,
    query_provider: Arc<dyn QueryProvider>,
}

impl fmt::Display for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation {{field={}}}", self.field.name)
    }
}

impl Table for FieldTable {
    fn element_type(&self) -> Option<&HostType> {
        Some(&self.element_type)
    }

    fn expression(&self) -> &Expression {
        &self.expression
    }

    fn query_provider(&self) -> &Arc<dyn QueryProvider> {
        &self.query_provider
    }

    fn enumerator(&self) -> Result<Enumerator> {
        to_enumerator(self.host.read_field(self.field.slot)?)
    }
}

/// Relation function over a host method.
#[derive(Debug)]
struct MethodTableFunction {
    host: Arc<dyn HostObject>,
    method: MethodRef,
    element_type: Option<HostType>,
    parameters: Vec<Parameter>,
    schema_expression: Expression,
    query_provider: Arc<dyn QueryProvider>,
}

impl fmt::Display for MethodTableFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member {{method={}}}", self.method.signature())
    }
}

impl TableFunction for MethodTableFunction {
    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn element_type(&self) -> Option<&HostType> {
        self.element_type.as_ref()
    }

    fn apply(&self, arguments: Vec<Value>) -> Result<Arc<dyn Table>> {
        self.method.check_arguments(&arguments)?;
        // Invoked once here; the produced relation replays this result.
        let result = self.host.invoke(self.method.slot, &arguments)?;
        let expression = Expression::call(
            self.schema_expression.clone(),
            self.method.clone(),
            arguments.into_iter().map(Expression::constant).collect(),
        );
        Ok(Arc::new(MethodTable {
            name: self.method.name.clone(),
            element_type: self.element_type.clone(),
            expression,
            query_provider: Arc::clone(&self.query_provider),
            result,
        }))
    }
}

/// Relation produced by applying a [`MethodTableFunction`].
#[derive(Debug)]
struct MethodTable {
    name: String,
    element_type: Option<HostType>,
    expression: Expression,
    query_provider: Arc<dyn QueryProvider>,
    result: Value,
}

impl fmt::Display for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation {{method={}}}", self.name)
    }
}

impl Table for MethodTable {
    fn element_type(&self) -> Option<&HostType> {
        self.element_type.as_ref()
    }

    fn expression(&self) -> &Expression {
        &self.expression
    }

    fn query_provider(&self) -> &Arc<dyn QueryProvider> {
        &self.query_provider
    }

    fn enumerator(&self) -> Result<Enumerator> {
        to_enumerator(self.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::RwLock;

    use super::*;
    use crate::catalog::DuplicateFieldPolicy;
    use crate::error::{AccessError, HostSchemaError};
    use crate::expression::ExpressionEvaluator;
    use crate::types::{HostTypeFactory, PrimitiveArray};

    struct Bag {
        items: RwLock<Vec<Value>>,
        calls: AtomicUsize,
    }

    impl Reflect for Bag {
        fn host_class() -> HostClass<Self> {
            HostClass::builder("Bag")
                .field("items", HostType::array(HostType::String), |b: &Bag| {
                    Ok(Value::array(b.items.read().clone()))
                })
                .field("size", HostType::Int64, |b: &Bag| {
                    Ok(Value::Int64(b.items.read().len() as i64))
                })
                .field("raw", HostType::array(HostType::Int32), |_: &Bag| {
                    Ok(Value::PrimitiveArray(PrimitiveArray::Int32(vec![1, 2].into())))
                })
                .private_field("hidden", HostType::array(HostType::String), |_: &Bag| {
                    Ok(Value::array(vec![]))
                })
                .method("snapshot", vec![], HostType::iterable("List"), |b: &Bag, _| {
                    b.calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::list(b.items.read().clone()))
                })
                .method("fail", vec![], HostType::iterable("List"), |_: &Bag, _| {
                    Err(AccessError::raised("boom"))
                })
                .method(
                    "take",
                    vec![HostType::Int32],
                    HostType::iterable("List"),
                    |b: &Bag, args| {
                        b.calls.fetch_add(1, Ordering::SeqCst);
                        let n = args[0].as_int64().unwrap_or(0) as usize;
                        Ok(Value::list(b.items.read().iter().take(n).cloned().collect()))
                    },
                )
                .build()
        }
    }

    fn bag() -> Arc<Bag> {
        Arc::new(Bag {
            items: RwLock::new(vec![Value::from("a"), Value::from("b")]),
            calls: AtomicUsize::new(0),
        })
    }

    fn schema(bag: &Arc<Bag>) -> ReflectiveSchema {
        ReflectiveSchema::new(
            Arc::new(ExpressionEvaluator::new()),
            bag,
            Arc::new(HostTypeFactory),
            Expression::root("bag"),
        )
        .unwrap()
    }

    #[test]
    fn test_only_collection_fields_become_tables() {
        let b = bag();
        let s = schema(&b);
        assert_eq!(s.table_names(), vec!["items", "raw"]);
        assert!(s.get_table("size").is_none());
        assert!(s.get_table("hidden").is_none());
    }

    #[test]
    fn test_base_methods_excluded() {
        let b = bag();
        let s = schema(&b);
        assert_eq!(s.function_names(), vec!["snapshot", "fail", "take"]);
        assert!(s.get_table_functions("to_string").is_empty());
        assert!(s.get_table_functions("hash_code").is_empty());
    }

    #[test]
    fn test_field_expression() {
        let b = bag();
        let s = schema(&b);
        let items = s.get_table("items").unwrap();
        assert_eq!(items.expression().to_string(), "bag.items");
        assert_eq!(items.to_string(), "Relation {field=items}");
    }

    #[test]
    fn test_apply_invokes_once() {
        let b = bag();
        let s = schema(&b);
        let snapshot = &s.get_table_functions("snapshot")[0];
        let table = snapshot.apply(vec![]).unwrap();
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);

        b.items.write().push(Value::from("c"));
        assert_eq!(table.enumerator().unwrap().count(), 2);
        assert_eq!(table.enumerator().unwrap().count(), 2);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_apply_failure_is_invocation_error() {
        let b = bag();
        let s = schema(&b);
        let fail = &s.get_table_functions("fail")[0];
        let err = fail.apply(vec![]).unwrap_err();
        assert!(matches!(
            err,
            HostSchemaError::MethodInvocation {
                source: AccessError::Raised(_),
                ..
            }
        ));
    }

    #[test]
    fn test_arity_checked() {
        let b = bag();
        let s = schema(&b);
        let snapshot = &s.get_table_functions("snapshot")[0];
        let err = snapshot.apply(vec![Value::Int32(1)]).unwrap_err();
        assert!(matches!(
            err,
            HostSchemaError::ArityMismatch {
                expected: 0,
                actual: 1,
                ..
            }
        ));
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_argument_types_checked() {
        let b = bag();
        let s = schema(&b);
        let take = &s.get_table_functions("take")[0];
        let err = take.apply(vec![Value::from("not an int")]).unwrap_err();
        assert!(matches!(
            err,
            HostSchemaError::ArgumentType { ordinal: 0, .. }
        ));
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);

        let table = take.apply(vec![Value::Int32(1)]).unwrap();
        let out: Vec<Value> = table.enumerator().unwrap().collect();
        assert_eq!(out, vec![Value::from("a")]);
    }

    #[test]
    fn test_duplicate_field_names() {
        let b = bag();
        let class = HostClass::builder("Bag")
            .field("items", HostType::array(HostType::String), |_: &Bag| {
                Ok(Value::array(vec![Value::from("first")]))
            })
            .field("items", HostType::array(HostType::String), |_: &Bag| {
                Ok(Value::array(vec![Value::from("second")]))
            })
            .build();
        let err = ReflectiveSchema::with_class(
            Arc::new(ExpressionEvaluator::new()),
            &b,
            class,
            Arc::new(HostTypeFactory),
            Expression::root("bag"),
            SchemaConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HostSchemaError::DuplicateTable(_)));

        let class = HostClass::builder("Bag")
            .field("items", HostType::array(HostType::String), |_: &Bag| {
                Ok(Value::array(vec![Value::from("first")]))
            })
            .field("items", HostType::array(HostType::String), |_: &Bag| {
                Ok(Value::array(vec![Value::from("second")]))
            })
            .build();
        let s = ReflectiveSchema::with_class(
            Arc::new(ExpressionEvaluator::new()),
            &b,
            class,
            Arc::new(HostTypeFactory),
            Expression::root("bag"),
            SchemaConfig::new().with_duplicate_fields(DuplicateFieldPolicy::Replace),
        )
        .unwrap();
        let out: Vec<Value> = s.get_table("items").unwrap().enumerator().unwrap().collect();
        assert_eq!(out, vec![Value::from("second")]);
    }
}

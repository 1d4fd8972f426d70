//! Name-indexed schema container.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{HostSchemaError, Result};
use crate::expression::{Expression, QueryProvider};
use crate::types::{HostType, RelDataType, TypeFactory};

use super::table::{Parameter, Table, TableFunction};

/// What to do when two relations are registered under one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicateFieldPolicy {
    /// Fail schema construction.
    #[default]
    Reject,
    /// Keep the later relation.
    Replace,
}

/// Configuration for schema construction.
#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    /// Handling of duplicate relation names.
    pub duplicate_fields: DuplicateFieldPolicy,
}

impl SchemaConfig {
    /// Creates a new schema configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate relation policy.
    #[must_use]
    pub fn with_duplicate_fields(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicate_fields = policy;
        self
    }
}

/// Catalog contract consumed by the query engine.
pub trait Schema: Send + Sync {
    /// Returns the schema's own root expression.
    fn expression(&self) -> &Expression;

    /// Returns the provider that executes expressions rooted at this schema.
    fn query_provider(&self) -> &Arc<dyn QueryProvider>;

    /// Returns the factory for relational types.
    fn type_factory(&self) -> &Arc<dyn TypeFactory>;

    /// Looks up a relation by name.
    fn get_table(&self, name: &str) -> Option<Arc<dyn Table>>;

    /// Looks up every relation function registered under `name`.
    fn get_table_functions(&self, name: &str) -> &[Arc<dyn TableFunction>];

    /// Returns all relation names, sorted.
    fn table_names(&self) -> Vec<&str>;

    /// Returns all function names in registration order.
    fn function_names(&self) -> Vec<&str>;
}

/// Schema backed by in-memory maps.
#[derive(Debug)]
pub struct MapSchema {
    query_provider: Arc<dyn QueryProvider>,
    type_factory: Arc<dyn TypeFactory>,
    expression: Expression,
    config: SchemaConfig,
    /// Relations by name.
    table_map: HashMap<String, Arc<dyn Table>>,
    /// Relation functions by name; overloads keep registration order.
    members_map: IndexMap<String, Vec<Arc<dyn TableFunction>>>,
}

impl MapSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(
        query_provider: Arc<dyn QueryProvider>,
        type_factory: Arc<dyn TypeFactory>,
        expression: Expression,
        config: SchemaConfig,
    ) -> Self {
        MapSchema {
            query_provider,
            type_factory,
            expression,
            config,
            table_map: HashMap::new(),
            members_map: IndexMap::new(),
        }
    }

    /// Registers a relation.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTable` if the name is taken and the policy is `Reject`.
    pub fn add_table(&mut self, name: &str, table: Arc<dyn Table>) -> Result<()> {
        if self.table_map.contains_key(name) {
            match self.config.duplicate_fields {
                DuplicateFieldPolicy::Reject => {
                    return Err(HostSchemaError::DuplicateTable(name.to_string()));
                }
                DuplicateFieldPolicy::Replace => {
                    warn!("relation '{name}' replaces an earlier relation of the same name");
                }
            }
        }
        debug!("registered {table}");
        self.table_map.insert(name.to_string(), table);
        Ok(())
    }

    /// Appends a relation function under `name`.
    pub fn add_function(&mut self, name: &str, function: Arc<dyn TableFunction>) {
        debug!("registered {function}");
        self.members_map
            .entry(name.to_string())
            .or_default()
            .push(function);
    }

    /// Summarizes the catalog.
    #[must_use]
    pub fn describe(&self) -> SchemaDescription {
        let tables = self
            .table_names()
            .into_iter()
            .filter_map(|name| {
                self.table_map.get(name).map(|table| TableDescription {
                    name: name.to_string(),
                    element_type: table.element_type().cloned(),
                    row_type: table.row_type(self.type_factory.as_ref()),
                })
            })
            .collect();
        let functions = self
            .members_map
            .iter()
            .flat_map(|(name, overloads)| {
                overloads.iter().map(move |f| FunctionDescription {
                    name: name.clone(),
                    parameters: f.parameters().to_vec(),
                    element_type: f.element_type().cloned(),
                })
            })
            .collect();
        SchemaDescription { tables, functions }
    }
}

impl Schema for MapSchema {
    fn expression(&self) -> &Expression {
        &self.expression
    }

    fn query_provider(&self) -> &Arc<dyn QueryProvider> {
        &self.query_provider
    }

    fn type_factory(&self) -> &Arc<dyn TypeFactory> {
        &self.type_factory
    }

    fn get_table(&self, name: &str) -> Option<Arc<dyn Table>> {
        self.table_map.get(name).cloned()
    }

    fn get_table_functions(&self, name: &str) -> &[Arc<dyn TableFunction>] {
        self.members_map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table_map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn function_names(&self) -> Vec<&str> {
        self.members_map.keys().map(String::as_str).collect()
    }
}

/// Serializable summary of a schema's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    /// Relations, sorted by name.
    pub tables: Vec<TableDescription>,
    /// Relation functions in registration order.
    pub functions: Vec<FunctionDescription>,
}

/// Summary of one relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub name: String,
    pub element_type: Option<HostType>,
    pub row_type: RelDataType,
}

/// Summary of one relation function overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub element_type: Option<HostType>,
}

impl SchemaDescription {
    /// Serializes the description to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            HostSchemaError::CatalogError(format!("Failed to serialize schema description: {e}"))
        })
    }

    /// Deserializes a description from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            HostSchemaError::CatalogError(format!(
                "Failed to deserialize schema description: {e}"
            ))
        })
    }

    /// Finds a relation summary by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDescription> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::enumerable::Enumerator;
    use crate::expression::ExpressionEvaluator;
    use crate::types::{DataType, HostTypeFactory, Value};

    #[derive(Debug)]
    struct Fixed {
        tag: &'static str,
        element_type: HostType,
        expression: Expression,
        provider: Arc<dyn QueryProvider>,
    }

    impl fmt::Display for Fixed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Relation {{fixed={}}}", self.tag)
        }
    }

    impl Table for Fixed {
        fn element_type(&self) -> Option<&HostType> {
            Some(&self.element_type)
        }

        fn expression(&self) -> &Expression {
            &self.expression
        }

        fn query_provider(&self) -> &Arc<dyn QueryProvider> {
            &self.provider
        }

        fn enumerator(&self) -> Result<Enumerator> {
            Ok(Enumerator::new(std::iter::once(Value::from(self.tag))))
        }
    }

    fn schema(policy: DuplicateFieldPolicy) -> MapSchema {
        MapSchema::new(
            Arc::new(ExpressionEvaluator::new()),
            Arc::new(HostTypeFactory),
            Expression::root("s"),
            SchemaConfig::new().with_duplicate_fields(policy),
        )
    }

    fn fixed(schema: &MapSchema, tag: &'static str) -> Arc<dyn Table> {
        Arc::new(Fixed {
            tag,
            element_type: HostType::Int64,
            expression: schema.expression().clone(),
            provider: Arc::clone(schema.query_provider()),
        })
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut s = schema(DuplicateFieldPolicy::Reject);
        let first = fixed(&s, "first");
        let second = fixed(&s, "second");
        s.add_table("t", first).unwrap();
        let err = s.add_table("t", second).unwrap_err();
        assert!(matches!(err, HostSchemaError::DuplicateTable(ref n) if n == "t"));
    }

    #[test]
    fn test_duplicate_replaced() {
        let mut s = schema(DuplicateFieldPolicy::Replace);
        let first = fixed(&s, "first");
        let second = fixed(&s, "second");
        s.add_table("t", first).unwrap();
        s.add_table("t", second).unwrap();
        let table = s.get_table("t").unwrap();
        let out: Vec<Value> = table.enumerator().unwrap().collect();
        assert_eq!(out, vec![Value::from("second")]);
        assert_eq!(s.table_names(), vec!["t"]);
    }

    #[test]
    fn test_missing_function_name_is_empty() {
        let s = schema(DuplicateFieldPolicy::Reject);
        assert!(s.get_table_functions("nothing").is_empty());
    }

    #[test]
    fn test_description_serialization() {
        let mut s = schema(DuplicateFieldPolicy::Reject);
        let t = fixed(&s, "x");
        s.add_table("t", t).unwrap();

        let bytes = s.describe().serialize().unwrap();
        let restored = SchemaDescription::deserialize(&bytes).unwrap();

        let table = restored.table("t").unwrap();
        assert_eq!(table.element_type, Some(HostType::Int64));
        assert_eq!(table.row_type, RelDataType::Scalar(DataType::Int64));
    }
}

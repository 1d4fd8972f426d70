//! `TableProvider` implementation for host relations.

use std::any::Any;
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use async_trait::async_trait;
use datafusion::catalog::Session;
use datafusion::datasource::{TableProvider, TableType};
use datafusion::error::{DataFusionError, Result as DfResult};
use datafusion::execution::context::SessionContext;
use datafusion::logical_expr::Expr;
use datafusion::physical_plan::memory::MemoryExec;
use datafusion::physical_plan::ExecutionPlan;
use log::debug;

use crate::catalog::{Schema, Table};
use crate::error::{HostSchemaError, Result};
use crate::types::{RelDataType, TypeFactory, Value};

use super::record_batch::{row_type_to_arrow, values_to_batch};

/// `TableProvider` over a host relation.
///
/// Each scan enumerates the relation afresh, so queries observe the host's
/// state at scan time.
#[derive(Debug)]
pub struct RelationTableProvider {
    /// The underlying relation.
    table: Arc<dyn Table>,
    /// Relational type of one row.
    row_type: RelDataType,
    /// Arrow schema for this relation.
    arrow_schema: SchemaRef,
}

impl RelationTableProvider {
    /// Creates a provider for the relation registered as `name`.
    #[must_use]
    pub fn new(name: &str, table: Arc<dyn Table>, type_factory: &dyn TypeFactory) -> Self {
        let row_type = table.row_type(type_factory);
        let arrow_schema = Arc::new(row_type_to_arrow(name, &row_type));
        RelationTableProvider {
            table,
            row_type,
            arrow_schema,
        }
    }

    /// Returns the underlying relation.
    #[must_use]
    pub fn table(&self) -> &Arc<dyn Table> {
        &self.table
    }

    /// Returns the row type.
    #[must_use]
    pub fn row_type(&self) -> &RelDataType {
        &self.row_type
    }
}

#[async_trait]
impl TableProvider for RelationTableProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> SchemaRef {
        self.arrow_schema.clone()
    }

    fn table_type(&self) -> TableType {
        TableType::Base
    }

    async fn scan(
        &self,
        _state: &dyn Session,
        projection: Option<&Vec<usize>>,
        _filters: &[Expr],
        limit: Option<usize>,
    ) -> DfResult<Arc<dyn ExecutionPlan>> {
        let enumerator = self
            .table
            .enumerator()
            .map_err(|e| DataFusionError::External(Box::new(e)))?;
        let rows: Vec<Value> = match limit {
            Some(n) => enumerator.take(n).collect(),
            None => enumerator.collect(),
        };
        let batch = values_to_batch(self.arrow_schema.clone(), &self.row_type, &rows)
            .map_err(|e| DataFusionError::External(Box::new(e)))?;
        let exec = MemoryExec::try_new(&[vec![batch]], self.schema(), projection.cloned())?;
        Ok(Arc::new(exec))
    }
}

/// Registers every relation of `schema` with a `DataFusion` session.
///
/// Returns the number of registered relations.
///
/// # Errors
///
/// Returns `ExecutionError` if `DataFusion` rejects a registration.
pub fn register_schema(schema: &dyn Schema, ctx: &SessionContext) -> Result<usize> {
    let mut registered = 0;
    for name in schema.table_names() {
        let Some(table) = schema.get_table(name) else {
            continue;
        };
        let provider = RelationTableProvider::new(name, table, schema.type_factory().as_ref());
        ctx.register_table(name, Arc::new(provider))
            .map_err(|e| HostSchemaError::ExecutionError(e.to_string()))?;
        debug!("registered relation '{name}' with DataFusion");
        registered += 1;
    }
    Ok(registered)
}

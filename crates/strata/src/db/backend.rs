use async_trait::async_trait;

use strata_core::error::{Result, StrataError};
use strata_core::schema::SchemaSnapshot;

/// Platform identifier handed to the differ when rendering DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
}

/// Narrow interface over the database connection collaborator.
///
/// Everything the engine needs from a live database: structural
/// introspection, DDL execution, a scalar single-column read, and a
/// single-value parameterized write. Implementations are expected to
/// run at most one operation at a time; the engine awaits each call
/// before issuing the next.
#[async_trait]
pub trait SchemaBackend: Send + Sync {
    /// Introspect the live schema into a snapshot.
    async fn introspect(&self) -> Result<SchemaSnapshot>;

    /// Execute a single DDL statement.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Run a query returning a single integer column of a single row.
    async fn query_scalar(&self, sql: &str) -> Result<Option<i64>>;

    /// Execute a statement with one bound integer parameter, returning
    /// the number of rows affected.
    async fn execute_with_i64(&self, sql: &str, value: i64) -> Result<u64>;

    /// Platform identifier for DDL generation.
    fn dialect(&self) -> Dialect;
}

/// Execute a batch of DDL statements sequentially, stopping at the
/// first failure. Statements already executed are not rolled back at
/// this layer; transactional guarantees belong to the backend.
pub(crate) async fn execute_ddl_batch(
    backend: &dyn SchemaBackend,
    statements: &[String],
) -> Result<()> {
    for statement in statements {
        tracing::debug!(statement = %statement, "executing schema statement");
        backend
            .execute(statement)
            .await
            .map_err(|e| StrataError::SchemaExecution {
                statement: statement.clone(),
                message: e.to_string(),
            })?;
    }

    Ok(())
}

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::schema::SchemaSnapshot;

/// Contract implemented by each discrete migration unit.
///
/// A unit is instantiated fresh once per run by the discoverer, holds no
/// state across runs, and is never persisted itself; only its version
/// and info payload outlive the run. `A` is the host application
/// context, passed through to [`app_up`](Migration::app_up) unmodified.
#[async_trait]
pub trait Migration<A: Send>: Send + Sync {
    /// The version this migration upgrades TO. Strictly positive,
    /// unique across all units, and the ordering key for a run.
    fn version(&self) -> u32;

    /// Schema-mutation step. Mutates the shared target snapshot;
    /// mutations from all pending units accumulate before any DDL is
    /// generated or executed.
    fn schema_up(&self, schema: &mut SchemaSnapshot);

    /// Application-hook step, invoked after the schema batch has been
    /// executed. Runs in ascending version order across units.
    async fn app_up(&self, app: &mut A) -> Result<()> {
        let _ = app;
        Ok(())
    }

    /// Optional descriptive metadata reported in the run result.
    fn info(&self) -> Option<Value> {
        None
    }
}

impl<A: Send> std::fmt::Debug for dyn Migration<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version())
            .finish()
    }
}

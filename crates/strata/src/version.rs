use tracing::{debug, info};

use strata_core::error::{Result, StrataError};
use strata_core::schema::{ColumnDef, SchemaSnapshot, SqlType, TableDef};

use crate::db::{execute_ddl_batch, SchemaBackend};
use crate::diff::SchemaDiffer;

/// Name of the bookkeeping table holding the current schema version.
pub const VERSION_TABLE: &str = "schema_version";

/// Name of its single integer column.
pub const VERSION_COLUMN: &str = "schema_version";

/// Reads and writes the persisted schema version.
///
/// The bookkeeping table holds exactly one row once initialized. The
/// version is read fresh at the start of every run rather than cached
/// on a long-lived instance.
pub struct VersionStore<'a> {
    backend: &'a dyn SchemaBackend,
}

impl<'a> VersionStore<'a> {
    pub fn new(backend: &'a dyn SchemaBackend) -> Self {
        Self { backend }
    }

    /// Check whether the bookkeeping table exists in a snapshot.
    pub fn has_version_table(snapshot: &SchemaSnapshot) -> bool {
        snapshot.has_table(VERSION_TABLE)
    }

    /// Create the bookkeeping table and insert the initial version row.
    ///
    /// Fails with `DuplicateTable` when the baseline already carries the
    /// table; callers check [`has_version_table`](Self::has_version_table)
    /// first.
    pub async fn create_version_table(
        &self,
        differ: &dyn SchemaDiffer,
        baseline: &SchemaSnapshot,
    ) -> Result<()> {
        let mut target = baseline.clone();
        let table = target.create_table(TableDef::new(VERSION_TABLE))?;
        table.add_column(ColumnDef::new(VERSION_COLUMN, SqlType::Integer).default_value("0"));

        let statements = differ.diff(baseline, &target, self.backend.dialect());
        execute_ddl_batch(self.backend, &statements).await?;

        let inserted = self
            .backend
            .execute_with_i64(
                &format!("INSERT INTO {} ({}) VALUES ($1)", VERSION_TABLE, VERSION_COLUMN),
                0,
            )
            .await?;

        if inserted != 1 {
            return Err(StrataError::Database(format!(
                "expected to insert one version row, inserted {}",
                inserted
            )));
        }

        info!("schema version bookkeeping initialized");
        Ok(())
    }

    /// Read the current version from the single bookkeeping row.
    pub async fn current(&self) -> Result<u32> {
        let value = self
            .backend
            .query_scalar(&format!("SELECT {} FROM {}", VERSION_COLUMN, VERSION_TABLE))
            .await?;

        match value {
            Some(v) if v >= 0 => {
                debug!(version = v, "read current schema version");
                Ok(v as u32)
            }
            Some(v) => Err(StrataError::Database(format!(
                "stored schema version {} is negative",
                v
            ))),
            None => Err(StrataError::BookkeepingMissing),
        }
    }

    /// Persist a new current version.
    ///
    /// The update carries no predicate; the single-row invariant is
    /// enforced by checking that exactly one row was touched.
    pub async fn set_current(&self, version: u32) -> Result<()> {
        let updated = self
            .backend
            .execute_with_i64(
                &format!("UPDATE {} SET {} = $1", VERSION_TABLE, VERSION_COLUMN),
                i64::from(version),
            )
            .await?;

        if updated != 1 {
            return Err(StrataError::Database(format!(
                "expected exactly one {} row, update touched {}",
                VERSION_TABLE, updated
            )));
        }

        info!(version, "schema version updated");
        Ok(())
    }
}

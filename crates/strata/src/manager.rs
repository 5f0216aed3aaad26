use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use strata_core::config::StrataConfig;
use strata_core::error::{Result, StrataError};
use strata_core::migration::MigrationRegistry;

use crate::db::{execute_ddl_batch, Database, SchemaBackend};
use crate::diff::{DefaultDiffer, SchemaDiffer};
use crate::discover::{Discoverer, DirectorySource};
use crate::version::VersionStore;

/// Outcome of a single `migrate()` invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrateOutcome {
    /// No pending migrations were found.
    NoOp,
    /// All pending migrations were applied.
    Applied(MigrationReport),
}

/// Summary of an applied run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Number of units executed.
    pub executed: usize,
    /// Info payloads keyed by version, for units that provided one.
    pub infos: BTreeMap<u32, Value>,
    /// Version before the run.
    pub from_version: u32,
    /// Version persisted by the run.
    pub to_version: u32,
}

/// Orchestrates a migration run: discovery, schema accumulation,
/// diffing, execution, application hooks, and version bookkeeping.
///
/// `A` is the host application context handed to every unit's hook.
/// A single logical writer is assumed; concurrent runs against the same
/// database must be serialized externally.
pub struct Migrator<A: Send> {
    backend: Box<dyn SchemaBackend>,
    differ: Box<dyn SchemaDiffer>,
    discoverer: Discoverer<A>,
}

impl<A: Send> Migrator<A> {
    pub fn new(
        backend: Box<dyn SchemaBackend>,
        differ: Box<dyn SchemaDiffer>,
        discoverer: Discoverer<A>,
    ) -> Self {
        Self {
            backend,
            differ,
            discoverer,
        }
    }

    /// Build a migrator from configuration: PostgreSQL backend, default
    /// differ, and directory-backed discovery resolved through the
    /// given registry.
    pub async fn from_config(
        config: &StrataConfig,
        registry: MigrationRegistry<A>,
    ) -> Result<Self> {
        let database = Database::from_config(&config.database).await?;
        let source = DirectorySource::new(config.migrations.dir.clone())
            .with_extension(&config.migrations.extension);
        let discoverer = Discoverer::new(
            Box::new(source),
            registry,
            config.migrations.namespace.clone(),
        );

        Ok(Self::new(
            Box::new(database.backend()),
            Box::new(DefaultDiffer),
            discoverer,
        ))
    }

    /// Whether the bookkeeping table exists.
    pub async fn is_initialized(&self) -> Result<bool> {
        let snapshot = self.backend.introspect().await?;
        Ok(VersionStore::has_version_table(&snapshot))
    }

    /// Create the version bookkeeping table with its initial `0` row.
    ///
    /// Must run once against a fresh database before the first
    /// `migrate()`. Calling it when the table already exists fails.
    pub async fn init(&self) -> Result<()> {
        let baseline = self.backend.introspect().await?;
        let store = VersionStore::new(self.backend.as_ref());
        store.create_version_table(self.differ.as_ref(), &baseline).await
    }

    /// Read the currently applied schema version.
    pub async fn current_version(&self) -> Result<u32> {
        let baseline = self.backend.introspect().await?;
        if !VersionStore::has_version_table(&baseline) {
            return Err(StrataError::BookkeepingMissing);
        }

        VersionStore::new(self.backend.as_ref()).current().await
    }

    /// Apply all pending migrations.
    ///
    /// Pending units mutate a shared target snapshot in ascending
    /// version order; the accumulated diff executes as one ordered
    /// batch before any application hook runs. The version of the last
    /// unit in discovery order is persisted once every hook has
    /// completed. Nothing is caught or retried here: a DDL failure
    /// leaves already-executed statements in place with the version
    /// unchanged, and a hook failure leaves the schema migrated with
    /// the version unchanged.
    pub async fn migrate(&self, app: &mut A) -> Result<MigrateOutcome> {
        let baseline = self.backend.introspect().await?;
        if !VersionStore::has_version_table(&baseline) {
            return Err(StrataError::BookkeepingMissing);
        }

        let store = VersionStore::new(self.backend.as_ref());
        let from = store.current().await?;

        let units = self.discoverer.find(from)?;
        if units.is_empty() {
            debug!(version = from, "no pending migrations");
            return Ok(MigrateOutcome::NoOp);
        }

        info!(pending = units.len(), from_version = from, "applying migrations");

        let mut target = baseline.clone();
        for unit in &units {
            unit.schema_up(&mut target);
        }

        let statements = self.differ.diff(&baseline, &target, self.backend.dialect());
        execute_ddl_batch(self.backend.as_ref(), &statements).await?;

        for unit in &units {
            unit.app_up(app)
                .await
                .map_err(|e| StrataError::ApplicationHook {
                    version: unit.version(),
                    message: e.to_string(),
                })?;
        }

        let mut report = MigrationReport {
            from_version: from,
            ..Default::default()
        };

        for unit in &units {
            if let Some(payload) = unit.info() {
                report.infos.insert(unit.version(), payload);
            }
            report.executed += 1;
        }

        // Discovery guarantees ascending order, so the last unit carries
        // the version to persist.
        let to = units.last().map(|u| u.version()).unwrap_or(from);
        store.set_current(to).await?;
        report.to_version = to;

        info!(executed = report.executed, to_version = to, "migrations complete");
        Ok(MigrateOutcome::Applied(report))
    }
}

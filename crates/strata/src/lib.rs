//! Code-first schema migration engine.
//!
//! Versioned migration units declare a schema mutation and an
//! application hook. The [`Migrator`] discovers pending units above the
//! persisted schema version, accumulates their schema mutations into a
//! target snapshot, executes the combined diff as one ordered DDL
//! batch, runs the hooks, and records the new version.

pub mod db;
pub mod diff;
pub mod discover;
pub mod manager;
pub mod testing;
pub mod version;

pub use db::{Database, Dialect, PgBackend, SchemaBackend};
pub use diff::{DefaultDiffer, DiffAction, DiffEntry, SchemaDiff, SchemaDiffer};
pub use discover::{Discoverer, DirectorySource, MigrationSource, StaticSource};
pub use manager::{MigrateOutcome, MigrationReport, Migrator};
pub use version::VersionStore;

pub use strata_core::config::{DatabaseConfig, MigrationsConfig, StrataConfig};
pub use strata_core::error::{Result, StrataError};
pub use strata_core::migration::{Migration, MigrationRegistry};
pub use strata_core::schema::{ColumnDef, SchemaSnapshot, SqlType, TableDef};

pub mod config;
pub mod error;
pub mod migration;
pub mod schema;

pub use config::{DatabaseConfig, MigrationsConfig, StrataConfig};
pub use error::{Result, StrataError};
pub use migration::{Migration, MigrationFactory, MigrationRegistry};
pub use schema::{ColumnDef, SchemaSnapshot, SqlType, TableDef};

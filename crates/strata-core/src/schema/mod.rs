mod column;
mod snapshot;
mod table;
mod types;

pub use column::ColumnDef;
pub use snapshot::SchemaSnapshot;
pub use table::TableDef;
pub use types::SqlType;

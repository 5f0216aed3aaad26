mod backend;
mod pool;
mod postgres;

pub use backend::{Dialect, SchemaBackend};
pub use pool::Database;
pub use postgres::PgBackend;

pub(crate) use backend::execute_ddl_batch;

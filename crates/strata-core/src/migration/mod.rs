mod registry;
mod traits;

pub use registry::{MigrationFactory, MigrationRegistry};
pub use traits::Migration;

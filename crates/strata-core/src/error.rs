use thiserror::Error;

/// Core error type for strata operations.
#[derive(Error, Debug)]
pub enum StrataError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("schema version bookkeeping table is missing; initialize it before migrating")]
    BookkeepingMissing,

    #[error("could not resolve migration \"{name}\" for artifact \"{artifact}\"")]
    UnresolvedMigration { name: String, artifact: String },

    #[error("failed to execute schema statement `{statement}`: {message}")]
    SchemaExecution { statement: String, message: String },

    #[error("application hook for migration {version} failed: {message}")]
    ApplicationHook { version: u32, message: String },

    #[error("table \"{0}\" already exists in schema snapshot")]
    DuplicateTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StrataError {
    fn from(e: serde_json::Error) -> Self {
        StrataError::Serialization(e.to_string())
    }
}

/// Result type alias using StrataError.
pub type Result<T> = std::result::Result<T, StrataError>;

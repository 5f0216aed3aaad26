//! In-memory schema backend for testing migrations without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use strata_core::error::{Result, StrataError};
use strata_core::schema::{ColumnDef, SchemaSnapshot, SqlType, TableDef};

use crate::db::{Dialect, SchemaBackend};
use crate::version::{VERSION_COLUMN, VERSION_TABLE};

/// Mock schema backend.
///
/// Holds a snapshot, a version cell, and a log of executed statements.
/// DDL execution tracks table existence only (CREATE/DROP TABLE update
/// the snapshot by name); column-level statements are just recorded.
/// Cloning shares the underlying state, so tests can keep a handle
/// after handing the backend to a migrator.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    snapshot: SchemaSnapshot,
    version: Option<i64>,
    executed: Vec<String>,
    fail_on: Option<String>,
}

impl MockBackend {
    /// Create a backend over an empty schema with no bookkeeping.
    pub fn new() -> Self {
        Self::with_snapshot(SchemaSnapshot::new())
    }

    /// Create a backend over a prepared snapshot.
    pub fn with_snapshot(snapshot: SchemaSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                snapshot,
                version: None,
                executed: Vec::new(),
                fail_on: None,
            })),
        }
    }

    /// Create an initialized backend: bookkeeping table present and the
    /// version row set to `version`.
    pub fn initialized(version: u32) -> Self {
        let mut snapshot = SchemaSnapshot::new();
        let mut table = TableDef::new(VERSION_TABLE);
        table.add_column(ColumnDef::new(VERSION_COLUMN, SqlType::Integer).default_value("0"));
        snapshot.put_table(table);

        let backend = Self::with_snapshot(snapshot);
        backend.state.lock().unwrap().version = Some(i64::from(version));
        backend
    }

    /// Make the next execution of a statement containing `fragment`
    /// fail.
    pub fn fail_on(&self, fragment: &str) {
        self.state.lock().unwrap().fail_on = Some(fragment.to_string());
    }

    /// Statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Current value of the version cell.
    pub fn version(&self) -> Option<i64> {
        self.state.lock().unwrap().version
    }

    /// Copy of the tracked snapshot.
    pub fn snapshot(&self) -> SchemaSnapshot {
        self.state.lock().unwrap().snapshot.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn leading_table_name(rest: &str) -> String {
    rest.chars()
        .take_while(|c| !c.is_whitespace() && *c != '(' && *c != ';')
        .collect()
}

#[async_trait]
impl SchemaBackend for MockBackend {
    async fn introspect(&self) -> Result<SchemaSnapshot> {
        Ok(self.state.lock().unwrap().snapshot.clone())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        if let Some(ref fragment) = state.fail_on {
            if sql.contains(fragment.as_str()) {
                return Err(StrataError::Database(format!(
                    "simulated failure executing `{}`",
                    sql
                )));
            }
        }

        state.executed.push(sql.to_string());

        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let name = leading_table_name(rest);
            state.snapshot.put_table(TableDef::new(&name));
        } else if let Some(rest) = sql.strip_prefix("DROP TABLE ") {
            let name = leading_table_name(rest);
            state.snapshot.drop_table(&name);
        }

        Ok(())
    }

    async fn query_scalar(&self, _sql: &str) -> Result<Option<i64>> {
        Ok(self.state.lock().unwrap().version)
    }

    async fn execute_with_i64(&self, sql: &str, value: i64) -> Result<u64> {
        let mut state = self.state.lock().unwrap();

        if sql.starts_with("INSERT") {
            state.version = Some(value);
            Ok(1)
        } else if sql.starts_with("UPDATE") {
            if state.version.is_some() {
                state.version = Some(value);
                Ok(1)
            } else {
                Ok(0)
            }
        } else {
            Err(StrataError::Database(format!(
                "mock backend cannot execute `{}`",
                sql
            )))
        }
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_table_tracks_existence() {
        let backend = MockBackend::new();
        backend
            .execute("CREATE TABLE users (\n    id UUID NOT NULL\n);")
            .await
            .unwrap();

        assert!(backend.snapshot().has_table("users"));
        assert_eq!(backend.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_drop_table() {
        let backend = MockBackend::new();
        backend.execute("CREATE TABLE users (x INTEGER);").await.unwrap();
        backend.execute("DROP TABLE users;").await.unwrap();

        assert!(!backend.snapshot().has_table("users"));
    }

    #[tokio::test]
    async fn test_fail_on_fragment() {
        let backend = MockBackend::new();
        backend.fail_on("widgets");

        backend.execute("CREATE TABLE users (x INTEGER);").await.unwrap();
        let err = backend
            .execute("CREATE TABLE widgets (x INTEGER);")
            .await
            .unwrap_err();

        assert!(matches!(err, StrataError::Database(_)));
        assert_eq!(backend.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_initialized_backend() {
        let backend = MockBackend::initialized(3);
        assert!(backend.snapshot().has_table(VERSION_TABLE));
        assert_eq!(backend.version(), Some(3));
    }
}

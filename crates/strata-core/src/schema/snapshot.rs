use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};

use super::table::TableDef;

/// In-memory structural description of a database schema at a point in
/// time.
///
/// Two snapshots live during a migration run: the introspected baseline
/// and the target, which starts as a deep copy of the baseline and
/// accumulates every pending unit's mutations before any DDL executes.
/// Tables are kept in a BTreeMap so diff output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    tables: BTreeMap<String, TableDef>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Check whether a table exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Add a new table. Fails if a table with the same name already
    /// exists, mirroring the behavior of live CREATE TABLE.
    pub fn create_table(&mut self, table: TableDef) -> Result<&mut TableDef> {
        match self.tables.entry(table.name.clone()) {
            std::collections::btree_map::Entry::Occupied(_) => {
                Err(StrataError::DuplicateTable(table.name))
            }
            std::collections::btree_map::Entry::Vacant(entry) => Ok(entry.insert(table)),
        }
    }

    /// Insert or replace a table without the duplicate check.
    /// Used by introspection, which rebuilds a snapshot from scratch.
    pub fn put_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Remove a table by name, returning it if present.
    pub fn drop_table(&mut self, name: &str) -> Option<TableDef> {
        self.tables.remove(name)
    }

    /// Look up a table by name.
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Look up a table mutably, for in-place column changes.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut TableDef> {
        self.tables.get_mut(name)
    }

    /// Iterate tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the snapshot has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::SqlType;

    #[test]
    fn test_create_and_lookup() {
        let mut snapshot = SchemaSnapshot::new();
        let table = snapshot.create_table(TableDef::new("users")).unwrap();
        table.column("id", SqlType::Uuid);

        assert!(snapshot.has_table("users"));
        assert!(snapshot.get_table("users").unwrap().has_column("id"));
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.create_table(TableDef::new("users")).unwrap();

        let err = snapshot.create_table(TableDef::new("users")).unwrap_err();
        assert!(matches!(err, StrataError::DuplicateTable(name) if name == "users"));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut baseline = SchemaSnapshot::new();
        baseline.create_table(TableDef::new("users")).unwrap();

        let mut target = baseline.clone();
        target
            .get_table_mut("users")
            .unwrap()
            .column("email", SqlType::Text);
        target.create_table(TableDef::new("posts")).unwrap();

        assert!(!baseline.get_table("users").unwrap().has_column("email"));
        assert!(!baseline.has_table("posts"));
        assert!(target.has_table("posts"));
    }

    #[test]
    fn test_tables_iterate_in_name_order() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.create_table(TableDef::new("zebras")).unwrap();
        snapshot.create_table(TableDef::new("apples")).unwrap();

        let names: Vec<&str> = snapshot.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apples", "zebras"]);
    }
}

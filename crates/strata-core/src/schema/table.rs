use serde::{Deserialize, Serialize};

use super::column::ColumnDef;
use super::types::SqlType;

/// Definition of a table within a schema snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name in SQL.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Create a new empty table definition.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Add a column, replacing any existing column with the same name.
    pub fn add_column(&mut self, column: ColumnDef) -> &mut Self {
        self.columns.retain(|c| c.name != column.name);
        self.columns.push(column);
        self
    }

    /// Convenience for adding a plain column by name and type.
    pub fn column(&mut self, name: &str, sql_type: SqlType) -> &mut Self {
        self.add_column(ColumnDef::new(name, sql_type))
    }

    /// Remove a column by name.
    pub fn drop_column(&mut self, name: &str) -> &mut Self {
        self.columns.retain(|c| c.name != name);
        self
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Generate the CREATE TABLE statement.
    pub fn to_create_table_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| format!("    {}", c.to_sql())).collect();

        format!("CREATE TABLE {} (\n{}\n);", self.name, columns.join(",\n"))
    }
}

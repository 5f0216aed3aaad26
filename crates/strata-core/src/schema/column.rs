use serde::{Deserialize, Serialize};

use super::types::SqlType;

/// Definition of a table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name in SQL.
    pub name: String,

    /// SQL type.
    pub sql_type: SqlType,

    /// Whether the column is nullable.
    pub nullable: bool,

    /// Default value expression (SQL).
    pub default: Option<String>,
}

impl ColumnDef {
    /// Create a new non-nullable column without a default.
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_string(),
            sql_type,
            nullable: false,
            default: None,
        }
    }

    /// Mark the column nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the default value expression.
    pub fn default_value(mut self, expr: &str) -> Self {
        self.default = Some(expr.to_string());
        self
    }

    /// Generate the column declaration for CREATE TABLE / ADD COLUMN.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.to_sql());

        if !self.nullable {
            sql.push_str(" NOT NULL");
        }

        if let Some(ref default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        sql
    }
}

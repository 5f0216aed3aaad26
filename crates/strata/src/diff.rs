use strata_core::schema::{ColumnDef, SchemaSnapshot, SqlType};

use crate::db::Dialect;

/// Boundary for the schema comparison collaborator: given the current
/// and target snapshots, produce the ordered DDL that transforms one
/// into the other.
pub trait SchemaDiffer: Send + Sync {
    fn diff(&self, current: &SchemaSnapshot, target: &SchemaSnapshot, dialect: Dialect) -> Vec<String>;
}

/// Default differ over the in-memory schema model.
pub struct DefaultDiffer;

impl SchemaDiffer for DefaultDiffer {
    fn diff(&self, current: &SchemaSnapshot, target: &SchemaSnapshot, dialect: Dialect) -> Vec<String> {
        // Single supported platform for now; the snapshot model renders
        // PostgreSQL DDL directly.
        let Dialect::Postgres = dialect;
        SchemaDiff::between(current, target).to_sql()
    }
}

/// Represents the difference between two schema snapshots.
#[derive(Debug, Clone)]
pub struct SchemaDiff {
    /// Changes to be applied, in execution order.
    pub entries: Vec<DiffEntry>,
}

impl SchemaDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Compare a current snapshot to a target snapshot.
    ///
    /// Additive changes (created tables, added columns, type changes)
    /// come first in target-table name order, destructive changes
    /// (dropped columns, dropped tables) last.
    pub fn between(current: &SchemaSnapshot, target: &SchemaSnapshot) -> Self {
        let mut entries = Vec::new();

        for target_table in target.tables() {
            match current.get_table(&target_table.name) {
                None => {
                    entries.push(DiffEntry {
                        action: DiffAction::CreateTable,
                        table_name: target_table.name.clone(),
                        details: format!("Create table {}", target_table.name),
                        sql: target_table.to_create_table_sql(),
                    });
                }
                Some(current_table) => {
                    for column in &target_table.columns {
                        match current_table.get_column(&column.name) {
                            None => {
                                entries.push(DiffEntry {
                                    action: DiffAction::AddColumn,
                                    table_name: target_table.name.clone(),
                                    details: format!("Add column {}", column.name),
                                    sql: Self::add_column_sql(&target_table.name, column),
                                });
                            }
                            Some(current_column) => {
                                if current_column.sql_type != column.sql_type {
                                    entries.push(DiffEntry {
                                        action: DiffAction::AlterColumn,
                                        table_name: target_table.name.clone(),
                                        details: format!(
                                            "Change column {} type from {} to {}",
                                            column.name,
                                            current_column.sql_type.to_sql(),
                                            column.sql_type.to_sql()
                                        ),
                                        sql: format!(
                                            "ALTER TABLE {} ALTER COLUMN {} TYPE {};",
                                            target_table.name,
                                            column.name,
                                            column.sql_type.to_sql()
                                        ),
                                    });
                                }
                            }
                        }
                    }

                    for current_column in &current_table.columns {
                        if !target_table.has_column(&current_column.name) {
                            entries.push(DiffEntry {
                                action: DiffAction::DropColumn,
                                table_name: target_table.name.clone(),
                                details: format!("Drop column {}", current_column.name),
                                sql: format!(
                                    "ALTER TABLE {} DROP COLUMN {};",
                                    target_table.name, current_column.name
                                ),
                            });
                        }
                    }
                }
            }
        }

        for current_table in current.tables() {
            if !target.has_table(&current_table.name) {
                entries.push(DiffEntry {
                    action: DiffAction::DropTable,
                    table_name: current_table.name.clone(),
                    details: format!("Drop table {}", current_table.name),
                    sql: format!("DROP TABLE {};", current_table.name),
                });
            }
        }

        Self { entries }
    }

    fn add_column_sql(table_name: &str, column: &ColumnDef) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            table_name,
            column.name,
            column.sql_type.to_sql()
        );

        if !column.nullable {
            if let Some(ref default) = column.default {
                sql.push_str(&format!(" NOT NULL DEFAULT {}", default));
            } else {
                // Adding NOT NULL to an existing table needs a value for
                // the rows already there.
                let default_val = match column.sql_type {
                    SqlType::Varchar(_) | SqlType::Text => "''",
                    SqlType::Integer | SqlType::BigInt => "0",
                    SqlType::DoublePrecision => "0",
                    SqlType::Boolean => "false",
                    SqlType::Timestamptz => "NOW()",
                    _ => "NULL",
                };
                sql.push_str(&format!(" NOT NULL DEFAULT {}", default_val));
            }
        } else if let Some(ref default) = column.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        sql.push(';');
        sql
    }

    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get all SQL statements in execution order.
    pub fn to_sql(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.sql.clone()).collect()
    }
}

impl Default for SchemaDiff {
    fn default() -> Self {
        Self::new()
    }
}

/// A single diff entry.
#[derive(Debug, Clone)]
pub struct DiffEntry {
    /// Type of action.
    pub action: DiffAction,
    /// Affected table name.
    pub table_name: String,
    /// Human-readable description.
    pub details: String,
    /// SQL to apply.
    pub sql: String,
}

/// Type of schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAction {
    CreateTable,
    DropTable,
    AddColumn,
    DropColumn,
    AlterColumn,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::schema::TableDef;

    fn snapshot_with_users() -> SchemaSnapshot {
        let mut snapshot = SchemaSnapshot::new();
        let table = snapshot.create_table(TableDef::new("users")).unwrap();
        table.column("id", SqlType::Uuid);
        snapshot
    }

    #[test]
    fn test_identical_snapshots_produce_empty_diff() {
        let baseline = snapshot_with_users();
        let diff = SchemaDiff::between(&baseline, &baseline.clone());
        assert!(diff.is_empty());
    }

    #[test]
    fn test_create_table_diff() {
        let baseline = SchemaSnapshot::new();
        let target = snapshot_with_users();

        let diff = SchemaDiff::between(&baseline, &target);

        assert_eq!(diff.entries.len(), 1);
        assert_eq!(diff.entries[0].action, DiffAction::CreateTable);
        assert!(diff.entries[0].sql.contains("CREATE TABLE users"));
    }

    #[test]
    fn test_add_column_diff() {
        let baseline = snapshot_with_users();
        let mut target = baseline.clone();
        target
            .get_table_mut("users")
            .unwrap()
            .column("email", SqlType::Varchar(None));

        let diff = SchemaDiff::between(&baseline, &target);

        assert_eq!(diff.entries.len(), 1);
        assert_eq!(diff.entries[0].action, DiffAction::AddColumn);
        assert_eq!(
            diff.entries[0].sql,
            "ALTER TABLE users ADD COLUMN email VARCHAR(255) NOT NULL DEFAULT '';"
        );
    }

    #[test]
    fn test_alter_column_type_diff() {
        let baseline = snapshot_with_users();
        let mut target = baseline.clone();
        target
            .get_table_mut("users")
            .unwrap()
            .column("id", SqlType::BigInt);

        let diff = SchemaDiff::between(&baseline, &target);

        assert_eq!(diff.entries.len(), 1);
        assert_eq!(diff.entries[0].action, DiffAction::AlterColumn);
        assert!(diff.entries[0].sql.contains("ALTER COLUMN id TYPE BIGINT"));
    }

    #[test]
    fn test_drop_column_and_table_come_last() {
        let mut baseline = snapshot_with_users();
        baseline
            .get_table_mut("users")
            .unwrap()
            .column("legacy", SqlType::Text);
        baseline.create_table(TableDef::new("old_stuff")).unwrap();

        let mut target = baseline.clone();
        target.get_table_mut("users").unwrap().drop_column("legacy");
        target.drop_table("old_stuff");
        target.create_table(TableDef::new("projects")).unwrap();

        let diff = SchemaDiff::between(&baseline, &target);
        let actions: Vec<DiffAction> = diff.entries.iter().map(|e| e.action).collect();

        assert_eq!(
            actions,
            vec![
                DiffAction::CreateTable,
                DiffAction::DropColumn,
                DiffAction::DropTable,
            ]
        );
    }

    #[test]
    fn test_default_differ_renders_postgres() {
        let baseline = SchemaSnapshot::new();
        let target = snapshot_with_users();

        let statements = DefaultDiffer.diff(&baseline, &target, Dialect::Postgres);

        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("CREATE TABLE users"));
    }
}

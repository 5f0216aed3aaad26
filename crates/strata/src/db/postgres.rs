use async_trait::async_trait;
use sqlx::{PgPool, Row};

use strata_core::error::{Result, StrataError};
use strata_core::schema::{ColumnDef, SchemaSnapshot, SqlType, TableDef};

use super::backend::{Dialect, SchemaBackend};

/// PostgreSQL implementation of the schema backend.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaBackend for PgBackend {
    async fn introspect(&self) -> Result<SchemaSnapshot> {
        let rows = sqlx::query(
            r#"
            SELECT table_name, column_name, data_type, is_nullable, column_default
            FROM information_schema.columns
            WHERE table_schema = 'public'
            ORDER BY table_name, ordinal_position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StrataError::Database(format!("Failed to introspect schema: {}", e)))?;

        let mut snapshot = SchemaSnapshot::new();

        for row in &rows {
            let table_name: String = row.get("table_name");
            let column_name: String = row.get("column_name");
            let data_type: String = row.get("data_type");
            let is_nullable: String = row.get("is_nullable");
            let column_default: Option<String> = row.get("column_default");

            if !snapshot.has_table(&table_name) {
                snapshot.put_table(TableDef::new(&table_name));
            }

            let mut column = ColumnDef::new(&column_name, SqlType::from_data_type(&data_type));
            column.nullable = is_nullable.eq_ignore_ascii_case("YES");
            column.default = column_default;

            if let Some(table) = snapshot.get_table_mut(&table_name) {
                table.add_column(column);
            }
        }

        Ok(snapshot)
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StrataError::Database(e.to_string()))?;

        Ok(())
    }

    async fn query_scalar(&self, sql: &str) -> Result<Option<i64>> {
        let value = sqlx::query_scalar::<_, i64>(sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StrataError::Database(e.to_string()))?;

        Ok(value)
    }

    async fn execute_with_i64(&self, sql: &str, value: i64) -> Result<u64> {
        let result = sqlx::query(sql)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| StrataError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}

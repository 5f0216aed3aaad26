use serde::{Deserialize, Serialize};

/// Column types supported by the schema model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
    /// UUID type
    Uuid,
    /// Variable-length string with optional max length
    Varchar(Option<u32>),
    /// Unlimited text
    Text,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    BigInt,
    /// 64-bit floating point
    DoublePrecision,
    /// Boolean
    Boolean,
    /// Timestamp with timezone
    Timestamptz,
    /// Date without time
    Date,
    /// JSONB for structured data
    Jsonb,
    /// Byte array
    Bytea,
}

impl SqlType {
    /// Generate the SQL type declaration.
    pub fn to_sql(&self) -> String {
        match self {
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Varchar(None) => "VARCHAR(255)".to_string(),
            SqlType::Varchar(Some(len)) => format!("VARCHAR({})", len),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::DoublePrecision => "DOUBLE PRECISION".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Timestamptz => "TIMESTAMPTZ".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Jsonb => "JSONB".to_string(),
            SqlType::Bytea => "BYTEA".to_string(),
        }
    }

    /// Map an introspected `information_schema` data type back to a
    /// schema model type. Unrecognized types fall back to `Text` so the
    /// differ never generates an ALTER for a type it cannot render.
    pub fn from_data_type(data_type: &str) -> Self {
        match data_type.to_ascii_lowercase().as_str() {
            "uuid" => SqlType::Uuid,
            "character varying" | "varchar" => SqlType::Varchar(None),
            "text" => SqlType::Text,
            "integer" | "int" | "int4" => SqlType::Integer,
            "bigint" | "int8" => SqlType::BigInt,
            "double precision" | "float8" => SqlType::DoublePrecision,
            "boolean" | "bool" => SqlType::Boolean,
            "timestamp with time zone" | "timestamptz" => SqlType::Timestamptz,
            "date" => SqlType::Date,
            "jsonb" => SqlType::Jsonb,
            "bytea" => SqlType::Bytea,
            _ => SqlType::Text,
        }
    }
}

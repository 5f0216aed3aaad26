mod database;

pub use database::DatabaseConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, StrataError};

/// Root configuration for strata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrataConfig {
    /// Database configuration.
    pub database: DatabaseConfig,

    /// Migration discovery configuration.
    pub migrations: MigrationsConfig,
}

/// Migration discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Directory scanned for migration source artifacts.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Namespace prefix concatenated with each matched identifier to
    /// build the registry lookup key. No implicit default: the prefix
    /// is always explicit configuration.
    pub namespace: String,

    /// File extension of candidate artifacts.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_dir() -> String {
    "migrations".to_string()
}

fn default_extension() -> String {
    "rs".to_string()
}

impl StrataConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StrataError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::parse_toml(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string, substituting
    /// `${VAR_NAME}` environment variable references first.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);
        toml::from_str(&content)
            .map_err(|e| StrataError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = StrataConfig::parse_toml(
            r#"
            [database]
            url = "postgres://localhost/app"

            [migrations]
            namespace = "app::migrations::"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://localhost/app");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.migrations.dir, "migrations");
        assert_eq!(config.migrations.namespace, "app::migrations::");
        assert_eq!(config.migrations.extension, "rs");
    }

    #[test]
    fn test_namespace_is_required() {
        let result = StrataConfig::parse_toml(
            r#"
            [database]
            url = "postgres://localhost/app"

            [migrations]
            dir = "migrations"
            "#,
        );

        assert!(matches!(result, Err(StrataError::Config(_))));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STRATA_TEST_DB_URL", "postgres://db.internal/app");

        let config = StrataConfig::parse_toml(
            r#"
            [database]
            url = "${STRATA_TEST_DB_URL}"

            [migrations]
            namespace = "app::migrations::"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://db.internal/app");
    }

    #[test]
    fn test_overrides() {
        let config = StrataConfig::parse_toml(
            r#"
            [database]
            url = "postgres://localhost/app"
            pool_size = 20
            pool_timeout_secs = 5

            [migrations]
            dir = "db/changes"
            namespace = "app::db::"
            extension = "sql"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.pool_size, 20);
        assert_eq!(config.database.pool_timeout_secs, 5);
        assert_eq!(config.migrations.dir, "db/changes");
        assert_eq!(config.migrations.extension, "sql");
    }
}

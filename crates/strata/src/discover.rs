use std::path::PathBuf;

use regex_lite::Regex;
use tracing::debug;

use strata_core::error::{Result, StrataError};
use strata_core::migration::{Migration, MigrationRegistry};

/// Source of candidate migration artifacts.
///
/// Yields artifact basenames (file stems); the discoverer filters them
/// by naming convention and resolves each against the registry.
pub trait MigrationSource: Send + Sync {
    fn candidates(&self) -> Result<Vec<String>>;
}

/// Directory-backed source: lists files with a given extension and
/// yields their stems. A missing directory yields no candidates.
pub struct DirectorySource {
    dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "rs".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }
}

impl MigrationSource for DirectorySource {
    fn candidates(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "migrations directory does not exist");
            return Ok(Vec::new());
        }

        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == self.extension.as_str()).unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        Ok(names)
    }
}

/// In-memory source, mainly for tests and registry-only setups.
pub struct StaticSource {
    names: Vec<String>,
}

impl StaticSource {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl MigrationSource for StaticSource {
    fn candidates(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }
}

/// Discovers pending migration units above a baseline version.
///
/// Candidates are filtered by the `Migration<digits>` naming pattern,
/// sorted by name ascending (which coincides with numeric order under
/// the zero-padded naming convention), and resolved through the
/// registry under the configured namespace prefix.
pub struct Discoverer<A: Send> {
    source: Box<dyn MigrationSource>,
    registry: MigrationRegistry<A>,
    namespace: String,
    pattern: Regex,
}

impl<A: Send> Discoverer<A> {
    pub fn new(
        source: Box<dyn MigrationSource>,
        registry: MigrationRegistry<A>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            source,
            registry,
            namespace: namespace.into(),
            pattern: Regex::new(r"^(Migration(\d+))$").expect("valid migration name pattern"),
        }
    }

    /// Find all units with version strictly greater than `from`, in
    /// ascending version order.
    ///
    /// An artifact whose name matches the pattern but has no registered
    /// implementation is fatal: no partial list is returned.
    pub fn find(&self, from: u32) -> Result<Vec<Box<dyn Migration<A>>>> {
        let mut names = self.source.candidates()?;
        names.sort();

        let mut migrations: Vec<Box<dyn Migration<A>>> = Vec::new();

        for artifact in &names {
            let Some(caps) = self.pattern.captures(artifact) else {
                continue;
            };

            let ident = &caps[1];
            let version: u32 = caps[2].parse().map_err(|_| {
                StrataError::Config(format!("invalid version number in artifact \"{}\"", artifact))
            })?;

            if version <= from {
                continue;
            }

            let name = format!("{}{}", self.namespace, ident);
            let unit = self
                .registry
                .resolve(&name)
                .ok_or_else(|| StrataError::UnresolvedMigration {
                    name: name.clone(),
                    artifact: artifact.clone(),
                })?;

            debug!(artifact = %artifact, version, "discovered pending migration");
            migrations.push(unit);
        }

        Ok(migrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    use strata_core::schema::SchemaSnapshot;

    struct Noop(u32);

    impl Migration<()> for Noop {
        fn version(&self) -> u32 {
            self.0
        }

        fn schema_up(&self, _schema: &mut SchemaSnapshot) {}
    }

    fn registry_with(versions: &[u32]) -> MigrationRegistry<()> {
        let mut registry = MigrationRegistry::new();
        for &v in versions {
            registry.register(&format!("app::Migration{:03}", v), move || Noop(v));
        }
        registry
    }

    #[test]
    fn test_find_sorts_unsorted_candidates() {
        let source = StaticSource::new(["Migration005", "Migration003", "Migration008"]);
        let discoverer = Discoverer::new(Box::new(source), registry_with(&[3, 5, 8]), "app::");

        let found = discoverer.find(0).unwrap();
        let versions: Vec<u32> = found.iter().map(|m| m.version()).collect();
        assert_eq!(versions, vec![3, 5, 8]);
    }

    #[test]
    fn test_find_skips_at_or_below_baseline() {
        let source = StaticSource::new([
            "Migration001",
            "Migration002",
            "Migration003",
            "Migration004",
            "Migration005",
        ]);
        let discoverer =
            Discoverer::new(Box::new(source), registry_with(&[1, 2, 3, 4, 5]), "app::");

        let found = discoverer.find(3).unwrap();
        let versions: Vec<u32> = found.iter().map(|m| m.version()).collect();
        assert_eq!(versions, vec![4, 5]);
    }

    #[test]
    fn test_find_ignores_non_matching_names() {
        let source = StaticSource::new(["Migration003", "README", "Migration_notes", "Seed001"]);
        let discoverer = Discoverer::new(Box::new(source), registry_with(&[3]), "app::");

        let found = discoverer.find(0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version(), 3);
    }

    #[test]
    fn test_leading_zeros_are_stripped() {
        let mut registry = MigrationRegistry::new();
        registry.register("app::Migration0007", || Noop(7));

        let source = StaticSource::new(["Migration0007"]);
        let discoverer = Discoverer::new(Box::new(source), registry, "app::");

        let found = discoverer.find(6).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version(), 7);
    }

    #[test]
    fn test_unresolved_candidate_aborts_discovery() {
        let source = StaticSource::new(["Migration001", "Migration002"]);
        // Only Migration001 is registered.
        let discoverer = Discoverer::new(Box::new(source), registry_with(&[1]), "app::");

        let err = discoverer.find(0).unwrap_err();
        assert!(matches!(
            err,
            StrataError::UnresolvedMigration { name, artifact }
                if name == "app::Migration002" && artifact == "Migration002"
        ));
    }

    #[test]
    fn test_directory_source_lists_matching_stems() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Migration002.rs"), "").unwrap();
        fs::write(dir.path().join("Migration001.rs"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let source = DirectorySource::new(dir.path());
        let mut names = source.candidates().unwrap();
        names.sort();

        assert_eq!(names, vec!["Migration001", "Migration002"]);
    }

    #[test]
    fn test_directory_source_missing_dir_is_empty() {
        let source = DirectorySource::new(Path::new("/nonexistent/migrations"));
        assert!(source.candidates().unwrap().is_empty());
    }

    #[test]
    fn test_directory_source_custom_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Migration001.sql"), "").unwrap();
        fs::write(dir.path().join("Migration002.rs"), "").unwrap();

        let source = DirectorySource::new(dir.path()).with_extension("sql");
        assert_eq!(source.candidates().unwrap(), vec!["Migration001"]);
    }
}

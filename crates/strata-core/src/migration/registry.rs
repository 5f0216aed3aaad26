use std::collections::HashMap;

use super::traits::Migration;

/// Constructor for a registered migration unit.
pub type MigrationFactory<A> = Box<dyn Fn() -> Box<dyn Migration<A>> + Send + Sync>;

/// Registry mapping fully-qualified migration names to constructors.
///
/// Registration replaces runtime code loading: the discoverer resolves
/// each matched artifact name (namespace prefix + identifier) here and
/// invokes the factory with no arguments. Populated by explicit
/// `register` calls during application startup.
pub struct MigrationRegistry<A: Send> {
    factories: HashMap<String, MigrationFactory<A>>,
}

impl<A: Send> MigrationRegistry<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a migration constructor under a fully-qualified name.
    pub fn register<M, F>(&mut self, name: &str, factory: F)
    where
        M: Migration<A> + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        self.factories
            .insert(name.to_string(), Box::new(move || Box::new(factory())));
    }

    /// Instantiate the migration registered under `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Migration<A>>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered migrations.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<A: Send> Default for MigrationRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

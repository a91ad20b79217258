use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::kernel::error::Result;
use crate::registry::container::{Instance, Resolver};
use crate::registry::definition::ComponentDefinition;

/// Constructs one component from its definition. Dependencies are looked up
/// through the resolver.
pub type Factory = Arc<dyn Fn(&mut Resolver<'_>, &ComponentDefinition) -> Result<Instance> + Send + Sync>;

/// Factories keyed by component kind.
///
/// The catalog is code, not data: it is never cached and must be supplied
/// again whenever a registry is restored from a snapshot.
#[derive(Default, Clone)]
pub struct ComponentCatalog {
    factories: HashMap<String, Factory>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `kind`
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&mut Resolver<'_>, &ComponentDefinition) -> Result<Instance> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    pub fn factory(&self, kind: &str) -> Option<&Factory> {
        self.factories.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for ComponentCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

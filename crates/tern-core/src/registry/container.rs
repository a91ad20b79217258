use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::kernel::error::{Error, Result};
use crate::registry::catalog::ComponentCatalog;
use crate::registry::definition::{ComponentDefinition, RegistrySnapshot};
use crate::registry::error::RegistryError;

/// A constructed component. Concrete types are recovered with
/// [`Registry::get_as`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Identifier → instance container with lazy, singleton construction
pub struct Registry {
    snapshot: RegistrySnapshot,
    // Index into `snapshot.components` by identifier
    definitions: HashMap<String, usize>,
    catalog: Arc<ComponentCatalog>,
    instances: RwLock<HashMap<String, Instance>>,
}

impl Registry {
    /// Adopt a snapshot, binding it to the factories in `catalog`.
    ///
    /// Every component kind named by the snapshot must have a factory,
    /// otherwise the snapshot belongs to a different build of the
    /// application and is rejected.
    pub fn restore(snapshot: RegistrySnapshot, catalog: Arc<ComponentCatalog>) -> Result<Self> {
        let mut definitions = HashMap::with_capacity(snapshot.components.len());
        for (index, definition) in snapshot.components.iter().enumerate() {
            if !catalog.contains(&definition.kind) {
                return Err(RegistryError::UnknownKind {
                    id: definition.id.clone(),
                    kind: definition.kind.clone(),
                }
                .into());
            }
            definitions.insert(definition.id.clone(), index);
        }

        Ok(Self {
            snapshot,
            definitions,
            catalog,
            instances: RwLock::new(HashMap::new()),
        })
    }

    /// Look up the instance bound to `id`, constructing it on first use.
    pub fn get(&self, id: &str) -> Result<Instance> {
        Resolver::new(self).get(id)
    }

    /// Look up `id` and downcast it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        Resolver::new(self).get_as::<T>(id)
    }

    /// Bind an already-constructed instance, replacing any previous binding.
    pub fn set(&self, id: impl Into<String>, instance: Instance) -> Result<()> {
        let id = id.into();
        let mut instances = self.instances.write().map_err(|_| RegistryError::LockPoisoned)?;
        log::debug!("Binding instance for '{}'", id);
        instances.insert(id, instance);
        Ok(())
    }

    /// Whether `id` is bound or defined
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
            || self
                .instances
                .read()
                .map(|instances| instances.contains_key(id))
                .unwrap_or(false)
    }

    /// Whether `id` has already been constructed or bound
    pub fn is_instantiated(&self, id: &str) -> bool {
        self.instances
            .read()
            .map(|instances| instances.contains_key(id))
            .unwrap_or(false)
    }

    /// All known identifiers, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.definitions.keys().cloned().collect();
        if let Ok(instances) = self.instances.read() {
            ids.extend(instances.keys().filter(|id| !self.definitions.contains_key(*id)).cloned());
        }
        ids.sort();
        ids
    }

    /// Identifiers of components carrying `tag`, in construction order
    pub fn tagged(&self, tag: &str) -> Vec<String> {
        self.snapshot
            .components
            .iter()
            .filter(|definition| definition.has_tag(tag))
            .map(|definition| definition.id.clone())
            .collect()
    }

    /// Identifiers of components that subscribe to the event bus
    pub fn listeners(&self) -> &[String] {
        &self.snapshot.listeners
    }

    pub fn definition(&self, id: &str) -> Option<&ComponentDefinition> {
        self.definitions
            .get(id)
            .map(|index| &self.snapshot.components[*index])
    }

    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    fn cached(&self, id: &str) -> Result<Option<Instance>> {
        let instances = self.instances.read().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(instances.get(id).cloned())
    }

    // First constructed instance wins if two lookups race
    fn store(&self, id: &str, instance: Instance) -> Result<Instance> {
        let mut instances = self.instances.write().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(instances.entry(id.to_string()).or_insert(instance).clone())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instantiated = self.instances.read().map(|i| i.len()).unwrap_or(0);
        f.debug_struct("Registry")
            .field("definitions", &self.definitions.len())
            .field("instantiated", &instantiated)
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Lookup handle given to factories.
///
/// Tracks the chain of identifiers currently under construction so a
/// component that (indirectly) depends on itself fails instead of recursing.
pub struct Resolver<'a> {
    registry: &'a Registry,
    stack: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn get(&mut self, id: &str) -> Result<Instance> {
        if let Some(instance) = self.registry.cached(id)? {
            return Ok(instance);
        }

        let definition = self
            .registry
            .definition(id)
            .ok_or_else(|| RegistryError::UnknownIdentifier { id: id.to_string() })?;

        if self.stack.iter().any(|pending| pending == id) {
            let mut chain = self.stack.clone();
            chain.push(id.to_string());
            return Err(RegistryError::CircularDependency { chain }.into());
        }

        let factory = self
            .registry
            .catalog
            .factory(&definition.kind)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownKind {
                id: definition.id.clone(),
                kind: definition.kind.clone(),
            })?;

        self.stack.push(id.to_string());
        let built = self.construct(definition, factory.as_ref());
        self.stack.pop();

        let instance = built?;
        log::debug!("Constructed component '{}' ({})", id, definition.kind);
        self.registry.store(id, instance)
    }

    pub fn get_as<T: Any + Send + Sync>(&mut self, id: &str) -> Result<Arc<T>> {
        let instance = self.get(id)?;
        instance.downcast::<T>().map_err(|_| {
            Error::from(RegistryError::TypeMismatch {
                id: id.to_string(),
                expected: type_name::<T>(),
            })
        })
    }

    fn construct(
        &mut self,
        definition: &ComponentDefinition,
        factory: &(dyn Fn(&mut Resolver<'_>, &ComponentDefinition) -> Result<Instance> + Send + Sync),
    ) -> Result<Instance> {
        // Declared dependencies are built first, in declaration order
        for dependency in &definition.dependencies {
            self.get(dependency)?;
        }
        factory(self, definition)
    }
}

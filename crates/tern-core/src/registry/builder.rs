use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::registry::catalog::ComponentCatalog;
use crate::registry::container::Registry;
use crate::registry::definition::{ComponentDefinition, RegistrySnapshot, LISTENER_TAG};
use crate::registry::error::RegistryError;

/// Validates a set of component definitions and produces a [`Registry`].
///
/// Building checks that identifiers are unique and not reserved, that every
/// kind has a factory, that every declared dependency is defined or reserved
/// and that the dependency graph is acyclic. The result is ordered dependencies-first.
pub struct RegistryBuilder<'a> {
    catalog: Arc<ComponentCatalog>,
    definitions: &'a [ComponentDefinition],
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(catalog: Arc<ComponentCatalog>, definitions: &'a [ComponentDefinition]) -> Self {
        Self { catalog, definitions }
    }

    pub fn build(self) -> Result<Registry> {
        let snapshot = self.snapshot()?;
        log::info!(
            "Built registry with {} components ({} listeners)",
            snapshot.components.len(),
            snapshot.listeners.len()
        );
        Registry::restore(snapshot, self.catalog)
    }

    /// Validate and order the definitions without binding them to a registry
    pub fn snapshot(&self) -> Result<RegistrySnapshot> {
        let mut by_id: HashMap<&str, &ComponentDefinition> = HashMap::with_capacity(self.definitions.len());

        for definition in self.definitions {
            if constants::RESERVED_IDS.contains(&definition.id.as_str()) {
                return Err(RegistryError::ReservedIdentifier { id: definition.id.clone() }.into());
            }
            if by_id.insert(definition.id.as_str(), definition).is_some() {
                return Err(RegistryError::DuplicateIdentifier { id: definition.id.clone() }.into());
            }
            if !self.catalog.contains(&definition.kind) {
                return Err(RegistryError::UnknownKind {
                    id: definition.id.clone(),
                    kind: definition.kind.clone(),
                }
                .into());
            }
        }

        // Reserved ids are bound by the kernel, so they satisfy dependencies
        // without a definition
        for definition in self.definitions {
            if let Some(missing) = definition.dependencies.iter().find(|dependency| {
                !by_id.contains_key(dependency.as_str()) && !constants::RESERVED_IDS.contains(&dependency.as_str())
            })
            {
                return Err(RegistryError::MissingDependency {
                    id: definition.id.clone(),
                    dependency: missing.clone(),
                }
                .into());
            }
        }

        let mut visits: HashMap<&str, Visit> = HashMap::new();
        let mut ordered: Vec<ComponentDefinition> = Vec::with_capacity(self.definitions.len());
        for definition in self.definitions {
            let mut path = Vec::new();
            Self::visit(definition, &by_id, &mut visits, &mut path, &mut ordered)?;
        }

        let listeners = ordered
            .iter()
            .filter(|definition| definition.has_tag(LISTENER_TAG))
            .map(|definition| definition.id.clone())
            .collect();

        Ok(RegistrySnapshot {
            source: self.definitions.to_vec(),
            components: ordered,
            listeners,
            built_at: Utc::now(),
        })
    }

    // Depth-first topological ordering; `path` is the current chain for cycle reports
    fn visit<'d>(
        definition: &'d ComponentDefinition,
        by_id: &HashMap<&'d str, &'d ComponentDefinition>,
        visits: &mut HashMap<&'d str, Visit>,
        path: &mut Vec<String>,
        ordered: &mut Vec<ComponentDefinition>,
    ) -> Result<()> {
        match visits.get(definition.id.as_str()) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = path.iter().position(|id| *id == definition.id).unwrap_or(0);
                let mut chain: Vec<String> = path[start..].to_vec();
                chain.push(definition.id.clone());
                return Err(RegistryError::CircularDependency { chain }.into());
            }
            None => {}
        }

        visits.insert(definition.id.as_str(), Visit::InProgress);
        path.push(definition.id.clone());

        for dependency in &definition.dependencies {
            // Reserved ids have no definition to order
            if let Some(&next) = by_id.get(dependency.as_str()) {
                Self::visit(next, by_id, visits, path, ordered)?;
            }
        }

        path.pop();
        visits.insert(definition.id.as_str(), Visit::Done);
        ordered.push(definition.clone());
        Ok(())
    }
}

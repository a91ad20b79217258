use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kernel::error::Result;
use crate::registry::error::RegistryError;

/// Tag marking components that must be subscribed to the event bus
pub const LISTENER_TAG: &str = "event.listener";

/// Serializable description of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            dependencies: Vec::new(),
            tags: Vec::new(),
            parameters: serde_json::Value::Null,
        }
    }

    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Decode the free-form parameters into a typed value
    pub fn parameters_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.parameters.clone()).map_err(|e| {
            RegistryError::InvalidParameters {
                id: self.id.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// The cacheable part of a registry.
///
/// `components` is in construction order (dependencies first). `source` keeps
/// the definitions the snapshot was built from so a cached snapshot can be
/// checked against the current application before it is adopted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub source: Vec<ComponentDefinition>,
    pub components: Vec<ComponentDefinition>,
    pub listeners: Vec<String>,
    pub built_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    /// Whether this snapshot was built from exactly `definitions`
    pub fn is_built_from(&self, definitions: &[ComponentDefinition]) -> bool {
        self.source.as_slice() == definitions
    }
}

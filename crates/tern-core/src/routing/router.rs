use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::error::Result;
use crate::routing::error::RoutingError;
use crate::routing::route::{Route, SharedHandler};

/// One entry of a route table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handler: handler.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, id: impl Into<String>) -> Self {
        self.params.push(id.into());
        self
    }
}

/// Parameters of the router component definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterParameters {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// Handlers by name
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, SharedHandler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: SharedHandler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&SharedHandler> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable").field("handlers", &self.names()).finish()
    }
}

/// Exact-path router
pub struct Router {
    routes: HashMap<String, Route>,
}

impl Router {
    /// Bind each definition to its handler. Unknown handlers and duplicate
    /// paths are rejected.
    pub fn from_definitions(definitions: &[RouteDefinition], handlers: &HandlerTable) -> Result<Self> {
        let mut routes = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if !definition.path.starts_with('/') {
                return Err(RoutingError::InvalidPath {
                    path: definition.path.clone(),
                    reason: "route paths must start with '/'".to_string(),
                }
                .into());
            }
            let handler = handlers.get(&definition.handler).ok_or_else(|| RoutingError::UnknownHandler {
                path: definition.path.clone(),
                handler: definition.handler.clone(),
            })?;
            let path = normalize_path(&definition.path);
            let route = Route::new(path.clone(), definition.handler.clone(), definition.params.clone(), handler.clone());
            if routes.insert(path.clone(), route).is_some() {
                return Err(RoutingError::DuplicateRoute { path }.into());
            }
        }
        log::debug!("Router bound {} route(s)", routes.len());
        Ok(Self { routes })
    }

    /// Resolve `path` to a route, if one is registered
    pub fn get_route(&self, path: &str) -> Option<Route> {
        self.routes.get(&normalize_path(path)).cloned()
    }

    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("paths", &self.paths()).finish()
    }
}

/// Collapse repeated slashes and drop a trailing slash (except for `/`)
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

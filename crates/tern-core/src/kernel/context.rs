//! Everything the kernel needs to boot, assembled by the host.
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{FileCachePool, MemoryCachePool, SharedCachePool};
use crate::config::{CacheBackend, KernelConfig};
use crate::event::{listener_instance, EventBus, RouteLogListener, SharedListener};
use crate::http::{SharedOutput, StdoutOutput};
use crate::kernel::constants::{
    EVENT_BUS_ID, EVENT_BUS_KIND, ROUTER_ID, ROUTER_KIND, ROUTE_LOGGER_ID, ROUTE_LOGGER_KIND,
};
use crate::kernel::env::{DotenvSource, EnvSource};
use crate::kernel::error::Result;
use crate::registry::{ComponentCatalog, ComponentDefinition, Instance, RegistryError, Resolver, LISTENER_TAG};
use crate::routing::{HandlerTable, RouteDefinition, RouteHandler, Router, RouterParameters};

/// Where the registry cache lives
#[derive(Clone)]
enum CacheSource {
    /// A store supplied by the host, or created once from configuration
    Pool(SharedCachePool),
    /// A file store opened when the registry is first needed
    Directory(PathBuf),
}

/// Host-supplied inputs of a [`Kernel`](crate::kernel::Kernel).
///
/// Built with [`BootstrapContext::builder`]. The kernel's own components
/// (event bus, router and route logger) are always part of the definitions.
pub struct BootstrapContext {
    config: KernelConfig,
    catalog: Arc<ComponentCatalog>,
    definitions: Vec<ComponentDefinition>,
    cache: CacheSource,
    env_source: Arc<dyn EnvSource>,
    output: SharedOutput,
}

impl BootstrapContext {
    pub fn builder(config: KernelConfig) -> ContextBuilder {
        ContextBuilder::new(config)
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<ComponentCatalog> {
        self.catalog.clone()
    }

    /// Component definitions in declaration order, kernel components last
    pub fn definitions(&self) -> &[ComponentDefinition] {
        &self.definitions
    }

    /// Obtain the cache store holding the registry snapshot
    pub fn open_cache_pool(&self) -> Result<SharedCachePool> {
        match &self.cache {
            CacheSource::Pool(pool) => Ok(pool.clone()),
            CacheSource::Directory(directory) => {
                let pool: SharedCachePool = Arc::new(FileCachePool::open(directory.clone())?);
                Ok(pool)
            }
        }
    }

    pub fn env_source(&self) -> Arc<dyn EnvSource> {
        self.env_source.clone()
    }

    pub fn output(&self) -> SharedOutput {
        self.output.clone()
    }
}

impl fmt::Debug for BootstrapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapContext")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("definitions", &self.definitions.len())
            .field("env_source", &self.env_source)
            .field("output", &self.output)
            .finish()
    }
}

/// Builder for [`BootstrapContext`]
pub struct ContextBuilder {
    config: KernelConfig,
    catalog: ComponentCatalog,
    definitions: Vec<ComponentDefinition>,
    routes: Vec<RouteDefinition>,
    handlers: HandlerTable,
    cache_pool: Option<SharedCachePool>,
    env_source: Option<Arc<dyn EnvSource>>,
    output: Option<SharedOutput>,
}

impl ContextBuilder {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            catalog: ComponentCatalog::new(),
            definitions: Vec::new(),
            routes: Vec::new(),
            handlers: HandlerTable::new(),
            cache_pool: None,
            env_source: None,
            output: None,
        }
    }

    /// Declare an application component
    pub fn component(mut self, definition: ComponentDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Register the factory for an application component kind
    pub fn factory<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&mut Resolver<'_>, &ComponentDefinition) -> Result<Instance> + Send + Sync + 'static,
    {
        self.catalog.register(kind, factory);
        self
    }

    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Register a handler under the name routes refer to it by
    pub fn handler(mut self, name: impl Into<String>, handler: Arc<dyn RouteHandler>) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Use `pool` instead of the store named by the configuration
    pub fn cache_pool(mut self, pool: SharedCachePool) -> Self {
        self.cache_pool = Some(pool);
        self
    }

    pub fn env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = Some(source);
        self
    }

    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Fails only if the route table cannot be encoded as router parameters
    pub fn build(self) -> Result<BootstrapContext> {
        let ContextBuilder {
            config,
            mut catalog,
            mut definitions,
            routes,
            handlers,
            cache_pool,
            env_source,
            output,
        } = self;

        register_kernel_kinds(&mut catalog, handlers);
        definitions.extend(kernel_definitions(routes)?);

        let cache = match (cache_pool, config.cache.backend) {
            (Some(pool), _) => CacheSource::Pool(pool),
            (None, CacheBackend::Memory) => CacheSource::Pool(Arc::new(MemoryCachePool::new())),
            (None, CacheBackend::File) => CacheSource::Directory(config.cache.directory.clone()),
        };
        let env_source = env_source.unwrap_or_else(|| Arc::new(DotenvSource::new(config.env_file.clone())));
        let output = output.unwrap_or_else(|| Arc::new(StdoutOutput));

        Ok(BootstrapContext {
            config,
            catalog: Arc::new(catalog),
            definitions,
            cache,
            env_source,
            output,
        })
    }
}

fn register_kernel_kinds(catalog: &mut ComponentCatalog, handlers: HandlerTable) {
    // Listener components are subscribed as the bus is built
    catalog.register(EVENT_BUS_KIND, |resolver, _definition| {
        let bus = EventBus::new();
        let registry = resolver.registry();
        for id in registry.listeners() {
            let listener = resolver.get_as::<SharedListener>(id)?;
            bus.subscribe(listener.as_ref().clone())?;
        }
        let instance: Instance = Arc::new(bus);
        Ok(instance)
    });

    catalog.register(ROUTER_KIND, move |_resolver, definition| {
        let parameters: RouterParameters = definition.parameters_as()?;
        let router = Router::from_definitions(&parameters.routes, &handlers)?;
        let instance: Instance = Arc::new(router);
        Ok(instance)
    });

    catalog.register(ROUTE_LOGGER_KIND, |_resolver, _definition| Ok(listener_instance(RouteLogListener)));
}

fn kernel_definitions(routes: Vec<RouteDefinition>) -> Result<Vec<ComponentDefinition>> {
    let router_parameters =
        serde_json::to_value(RouterParameters { routes }).map_err(|e| RegistryError::InvalidParameters {
            id: ROUTER_ID.to_string(),
            message: e.to_string(),
        })?;
    Ok(vec![
        ComponentDefinition::new(ROUTE_LOGGER_ID, ROUTE_LOGGER_KIND).tagged(LISTENER_TAG),
        ComponentDefinition::new(EVENT_BUS_ID, EVENT_BUS_KIND),
        ComponentDefinition::new(ROUTER_ID, ROUTER_KIND).with_parameters(router_parameters),
    ])
}

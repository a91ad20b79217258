use std::sync::Arc;

use crate::cache::{CacheEntry, CacheError, CachePool, SharedCachePool};
use crate::event::{EventBus, KernelStartEvent, RouteMatchedEvent, RouteNotFoundEvent};
use crate::http::{Request, Response};
use crate::kernel::constants::{
    APP_NAME, APP_VERSION, CACHE_POOL_ID, EVENT_BUS_ID, NOT_FOUND_BODY, NOT_FOUND_STATUS, OUTPUT_ID,
    REGISTRY_CACHE_KEY, ROUTER_ID,
};
use crate::kernel::context::BootstrapContext;
use crate::kernel::env::EnvironmentMap;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::error_handler::ErrorHandler;
use crate::registry::{Instance, Registry, RegistryBuilder, RegistrySnapshot};
use crate::routing::{Arguments, Router};

/// Outcome of [`Kernel::handle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A route matched and its handler returned successfully
    Handled { path: String, handler: String },
    /// No route matched; the not-found response was emitted
    NotFound { path: String },
}

/// Bootstraps the application and dispatches requests.
///
/// The registry, event bus and environment are each produced at most once
/// per kernel and shared afterwards.
pub struct Kernel {
    context: BootstrapContext,
    registry: Option<Arc<Registry>>,
    event_bus: Option<Arc<EventBus>>,
    env: Option<Arc<EnvironmentMap>>,
}

impl Kernel {
    /// Install error reporting, initialize the registry and publish
    /// [`KernelStartEvent`].
    pub async fn new(context: BootstrapContext) -> Result<Self> {
        ErrorHandler::initialize();
        log::info!("Initializing {} v{}", APP_NAME, APP_VERSION);

        let mut kernel = Self {
            context,
            registry: None,
            event_bus: None,
            env: None,
        };

        kernel.ensure_registry().map_err(|e| {
            Error::lifecycle(KernelLifecyclePhase::RegistryInitialization, "failed to initialize the registry", e)
        })?;

        let bus = kernel
            .event_bus()
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Start, "event bus unavailable", e))?;
        bus.dispatch(&KernelStartEvent::now())
            .await
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Start, "failed to publish the start event", e))?;

        log::info!("{} kernel started", APP_NAME);
        Ok(kernel)
    }

    pub fn context(&self) -> &BootstrapContext {
        &self.context
    }

    /// The registry, if it has been initialized
    pub fn registry(&self) -> Option<&Arc<Registry>> {
        self.registry.as_ref()
    }

    /// Initialize the registry on first call and return it.
    ///
    /// A cached snapshot is adopted when it was built from the current
    /// definitions; otherwise the registry is built and the snapshot saved.
    /// Either way the cache store and the output channel are bound before the
    /// registry is returned.
    pub fn ensure_registry(&mut self) -> Result<Arc<Registry>> {
        if let Some(registry) = &self.registry {
            return Ok(registry.clone());
        }

        let pool = self.context.open_cache_pool()?;
        let registry = match self.restore_registry(pool.as_ref())? {
            Some(registry) => registry,
            None => {
                let registry = RegistryBuilder::new(self.context.catalog(), self.context.definitions()).build()?;
                pool.save(CacheEntry::from_serializable(REGISTRY_CACHE_KEY, registry.snapshot())?)?;
                log::info!("Saved registry snapshot to the {} cache", pool.name());
                registry
            }
        };

        let cache_instance: Instance = Arc::new(SharedCachePool::clone(&pool));
        registry.set(CACHE_POOL_ID, cache_instance)?;
        let output_instance: Instance = Arc::new(self.context.output());
        registry.set(OUTPUT_ID, output_instance)?;

        let registry = Arc::new(registry);
        self.registry = Some(registry.clone());
        Ok(registry)
    }

    // Ok(None) means the registry has to be built
    fn restore_registry(&self, pool: &dyn CachePool) -> Result<Option<Registry>> {
        if !pool.has_item(REGISTRY_CACHE_KEY)? {
            log::debug!("No cached registry in the {} cache", pool.name());
            return Ok(None);
        }

        let entry = match pool.get_item(REGISTRY_CACHE_KEY) {
            Ok(Some(entry)) => entry,
            Ok(None) => return Ok(None),
            Err(Error::Cache(e @ CacheError::Corrupt { .. })) => {
                log::warn!("Discarding cached registry: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let snapshot: RegistrySnapshot = match entry.decode() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Discarding cached registry: {}", e);
                return Ok(None);
            }
        };

        if !snapshot.is_built_from(self.context.definitions()) {
            log::warn!("Cached registry from {} is stale, rebuilding", snapshot.built_at);
            return Ok(None);
        }

        match Registry::restore(snapshot, self.context.catalog()) {
            Ok(registry) => {
                log::info!("Restored registry from the {} cache", pool.name());
                Ok(Some(registry))
            }
            Err(Error::Registry(e)) => {
                log::warn!("Cached registry does not match this build: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The event bus, resolved from the registry on first call
    pub fn event_bus(&mut self) -> Result<Arc<EventBus>> {
        if let Some(bus) = &self.event_bus {
            return Ok(bus.clone());
        }
        let registry = self.ensure_registry()?;
        let bus = registry.get_as::<EventBus>(EVENT_BUS_ID)?;
        self.event_bus = Some(bus.clone());
        Ok(bus)
    }

    /// Environment variables, loaded on first call
    pub fn env(&mut self) -> Result<Arc<EnvironmentMap>> {
        if let Some(env) = &self.env {
            return Ok(env.clone());
        }
        let vars = self.context.env_source().load()?;
        log::debug!("Loaded {} environment variable(s)", vars.len());
        let env = Arc::new(EnvironmentMap::new(vars));
        self.env = Some(env.clone());
        Ok(env)
    }

    /// Route `request` and invoke the matching handler.
    ///
    /// When no route matches, the not-found response is written to the
    /// output channel and `Dispatch::NotFound` is returned. A router that
    /// cannot be resolved is a `Dispatch` lifecycle error. Errors from
    /// argument resolution and from the handler itself are returned as is.
    pub async fn handle(&mut self, request: &Request) -> Result<Dispatch> {
        let path = request.requested_page().to_string();
        let registry = self.ensure_registry()?;
        let bus = self.event_bus()?;
        let router = registry
            .get_as::<Router>(ROUTER_ID)
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Dispatch, "router unavailable", e))?;

        let Some(route) = router.get_route(&path) else {
            log::info!("No route for {}", path);
            bus.dispatch(&RouteNotFoundEvent {
                request: request.clone(),
                path: path.clone(),
            })
            .await?;
            Response::new(NOT_FOUND_STATUS, NOT_FOUND_BODY).respond(self.context.output().as_ref())?;
            return Ok(Dispatch::NotFound { path });
        };

        bus.dispatch(&RouteMatchedEvent {
            request: request.clone(),
            path: path.clone(),
            handler: route.handler_name().to_string(),
            params: route.params().to_vec(),
        })
        .await?;

        let args = resolve_arguments(&registry, route.params())?;
        route.invoke(args).await?;

        Ok(Dispatch::Handled {
            path,
            handler: route.handler_name().to_string(),
        })
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("context", &self.context)
            .field("registry", &self.registry)
            .field("event_bus_ready", &self.event_bus.is_some())
            .field("env_loaded", &self.env.is_some())
            .finish()
    }
}

/// Look up each identifier in order
pub fn resolve_arguments(registry: &Registry, params: &[String]) -> Result<Arguments> {
    let mut args = Arguments::new();
    for id in params {
        args.push(id.clone(), registry.get(id)?);
    }
    Ok(args)
}

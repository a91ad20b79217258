use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::registry::{Instance, RegistryError};
use crate::routing::error::RoutingError;

/// Uniform signature every route handler is invoked through
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn call(&self, args: Arguments) -> Result<()>;
}

pub type SharedHandler = Arc<dyn RouteHandler>;

struct FnHandler<F, Fut> {
    f: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> RouteHandler for FnHandler<F, Fut>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn call(&self, args: Arguments) -> Result<()> {
        (self.f)(args).await
    }
}

/// Build a handler from an async closure
pub fn handler_fn<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnHandler { f, _future: PhantomData })
}

/// Positional arguments resolved from the registry, in declaration order
#[derive(Clone, Default)]
pub struct Arguments {
    values: Vec<(String, Instance)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, instance: Instance) {
        self.values.push((id.into(), instance));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Identifiers in argument order
    pub fn ids(&self) -> Vec<&str> {
        self.values.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Instance> {
        self.values.get(index).map(|(_, instance)| instance)
    }

    /// Downcast the argument at `index` to `T`
    pub fn get_as<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let (id, instance) = self.values.get(index).ok_or(RoutingError::ArgumentOutOfRange {
            index,
            len: self.values.len(),
        })?;
        instance.clone().downcast::<T>().map_err(|_| {
            RegistryError::TypeMismatch {
                id: id.clone(),
                expected: type_name::<T>(),
            }
            .into()
        })
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments").field("ids", &self.ids()).finish()
    }
}

/// A matched route: handler plus the identifiers to resolve for it
#[derive(Clone)]
pub struct Route {
    path: String,
    handler_name: String,
    params: Vec<String>,
    handler: SharedHandler,
}

impl Route {
    pub fn new(
        path: impl Into<String>,
        handler_name: impl Into<String>,
        params: Vec<String>,
        handler: SharedHandler,
    ) -> Self {
        Self {
            path: path.into(),
            handler_name: handler_name.into(),
            params,
            handler,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    /// Registry identifiers of the handler's parameters, in order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub async fn invoke(&self, args: Arguments) -> Result<()> {
        self.handler.call(args).await
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("handler_name", &self.handler_name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

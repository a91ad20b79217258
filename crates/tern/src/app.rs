//! The demo application served by the `tern` binary.
use std::sync::Arc;

use async_trait::async_trait;
use tern_core::cache::SharedCachePool;
use tern_core::config::KernelConfig;
use tern_core::http::SharedOutput;
use tern_core::kernel::constants::{CACHE_POOL_ID, OUTPUT_ID};
use tern_core::kernel::{BootstrapContext, EnvironmentMap};
use tern_core::registry::{ComponentDefinition, Instance, RegistryError};
use tern_core::routing::{handler_fn, RouteDefinition};
use tern_core::{Arguments, Kernel, KernelError, Response, RouteHandler};

/// Identifier the environment map is bound under
pub const ENVIRONMENT_ID: &str = "environment";

const GREETER_ID: &str = "greeter";
const GREETER_KIND: &str = "greeter";
const DEFAULT_GREETING: &str = "Welcome to Tern";

/// Prefix of the variables the `/env` route reports
const ENV_PREFIX: &str = "APP_";

#[derive(Debug)]
pub struct Greeter {
    greeting: String,
}

struct HomeHandler;

#[async_trait]
impl RouteHandler for HomeHandler {
    async fn call(&self, args: Arguments) -> Result<(), KernelError> {
        let output = args.get_as::<SharedOutput>(0)?;
        let greeter = args.get_as::<Greeter>(1)?;
        Response::ok(greeter.greeting.clone())
            .with_header("Content-Type", "text/plain")
            .respond(&**output)
    }
}

/// Build the bootstrap context of the demo application
pub fn context(config: KernelConfig) -> Result<BootstrapContext, KernelError> {
    BootstrapContext::builder(config)
        .factory(GREETER_KIND, |_resolver, definition| {
            let greeting = definition.parameters["greeting"]
                .as_str()
                .ok_or_else(|| RegistryError::InvalidParameters {
                    id: definition.id.clone(),
                    message: "'greeting' must be a string".to_string(),
                })?
                .to_string();
            let instance: Instance = Arc::new(Greeter { greeting });
            Ok(instance)
        })
        .component(
            ComponentDefinition::new(GREETER_ID, GREETER_KIND)
                .with_parameters(serde_json::json!({ "greeting": DEFAULT_GREETING })),
        )
        .route(RouteDefinition::new("/", "home").param(OUTPUT_ID).param(GREETER_ID))
        .route(RouteDefinition::new("/health", "health").param(OUTPUT_ID).param(CACHE_POOL_ID))
        .route(RouteDefinition::new("/env", "env").param(OUTPUT_ID).param(ENVIRONMENT_ID))
        .handler("home", Arc::new(HomeHandler))
        .handler(
            "health",
            handler_fn(|args: Arguments| async move {
                let output = args.get_as::<SharedOutput>(0)?;
                let pool = args.get_as::<SharedCachePool>(1)?;
                let body = serde_json::json!({ "status": "ok", "cache": pool.name() });
                Response::ok(body.to_string())
                    .with_header("Content-Type", "application/json")
                    .respond(&**output)
            }),
        )
        .handler(
            "env",
            handler_fn(|args: Arguments| async move {
                let output = args.get_as::<SharedOutput>(0)?;
                let env = args.get_as::<EnvironmentMap>(1)?;
                let body: Vec<String> = env
                    .iter()
                    .filter(|(name, _)| name.starts_with(ENV_PREFIX))
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                Response::ok(body.join("\n"))
                    .with_header("Content-Type", "text/plain")
                    .respond(&**output)
            }),
        )
        .build()
}

/// Make the kernel's environment map resolvable by route handlers
pub fn bind_environment(kernel: &mut Kernel) -> Result<(), KernelError> {
    let env = kernel.env()?;
    let registry = kernel.ensure_registry()?;
    let instance: Instance = env;
    registry.set(ENVIRONMENT_ID, instance)
}

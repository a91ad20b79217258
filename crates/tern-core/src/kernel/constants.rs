/// Application name
pub const APP_NAME: &str = "Tern";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cache key the registry snapshot is stored under
pub const REGISTRY_CACHE_KEY: &str = "container";

/// Registry identifier of the cache store, bound by the kernel
pub const CACHE_POOL_ID: &str = "cachePool";

/// Registry identifier of the output channel, bound by the kernel
pub const OUTPUT_ID: &str = "output";

/// Identifiers the kernel binds itself; application definitions may not use them
pub const RESERVED_IDS: &[&str] = &[CACHE_POOL_ID, OUTPUT_ID];

/// Registry identifier of the event bus
pub const EVENT_BUS_ID: &str = "event_dispatcher";

/// Registry identifier of the router
pub const ROUTER_ID: &str = "router";

/// Registry identifier of the built-in route logging listener
pub const ROUTE_LOGGER_ID: &str = "route_logger";

/// Component kinds provided by the kernel
pub const EVENT_BUS_KIND: &str = "event_bus";
pub const ROUTER_KIND: &str = "router";
pub const ROUTE_LOGGER_KIND: &str = "route_logger";

/// Default environment file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default file cache directory, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = "var/cache";

/// Status and body of the response emitted when no route matches
pub const NOT_FOUND_STATUS: u16 = 404;
pub const NOT_FOUND_BODY: &str = "Page was not found :(";

use std::any::Any;

use chrono::{DateTime, Utc};

use crate::event::Event;
use crate::http::Request;

/// Published once, at the end of kernel construction
#[derive(Debug, Clone)]
pub struct KernelStartEvent {
    pub timestamp: DateTime<Utc>,
}

impl KernelStartEvent {
    pub const NAME: &'static str = "kernel.start";

    pub fn now() -> Self {
        Self { timestamp: Utc::now() }
    }
}

impl Event for KernelStartEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Published before a matched route's handler is invoked
#[derive(Debug, Clone)]
pub struct RouteMatchedEvent {
    pub request: Request,
    pub path: String,
    pub handler: String,
    pub params: Vec<String>,
}

impl RouteMatchedEvent {
    pub const NAME: &'static str = "route.matched";
}

impl Event for RouteMatchedEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Published before the not-found response is emitted
#[derive(Debug, Clone)]
pub struct RouteNotFoundEvent {
    pub request: Request,
    pub path: String,
}

impl RouteNotFoundEvent {
    pub const NAME: &'static str = "route.not_found";
}

impl Event for RouteNotFoundEvent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct TestEvent {
    pub name: &'static str,
}

#[cfg(test)]
impl Event for TestEvent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

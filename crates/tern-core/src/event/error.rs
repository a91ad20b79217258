//! # Tern Event System Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Attempted to operate on a poisoned event dispatcher component: {component}")]
    DispatcherPoisoned { component: String },
}

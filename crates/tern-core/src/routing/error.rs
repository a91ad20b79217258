//! # Tern Routing Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Route '{path}' refers to unknown handler '{handler}'")]
    UnknownHandler { path: String, handler: String },

    #[error("Route '{path}' is defined more than once")]
    DuplicateRoute { path: String },

    #[error("Invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Argument {index} is out of range for a call with {len} argument(s)")]
    ArgumentOutOfRange { index: usize, len: usize },
}

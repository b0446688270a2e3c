//! # Resource Errors
//!
//! Every failure the routing and dispatch core can report. Each variant maps to an HTTP
//! status so an [`ErrorHandler`](crate::handler::ErrorHandler) can turn it into a
//! response without crashing the worker that hit it.

use http::{Method, StatusCode};
use thiserror::Error;

/// Errors raised while building routes or resolving and executing a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// `execute` was called on a handler that never had a function bound.
    #[error("{0}")]
    HandlerMissing(String),

    /// A path parameter could not be coerced to the declared type.
    #[error("{0}")]
    InvalidArgument(String),

    /// No mapper is registered for the body's media type.
    #[error("Media type not supported: {0}")]
    MediaTypeNotSupported(String),

    /// A registry was configured inconsistently, e.g. a duplicate media type.
    #[error("{0}")]
    IllegalState(String),

    /// A payload could not be (de)serialized.
    #[error("Mapping failed: {0}")]
    Mapping(String),

    /// A path template could not be compiled.
    #[error("Invalid path template: {0}")]
    InvalidTemplate(String),
}

impl ResourceError {
    pub fn handler_missing(method: &Method, path: &str) -> Self {
        ResourceError::HandlerMissing(format!("No handler defined for {} {}", method, path))
    }

    /// HTTP status used by the default error handler.
    pub fn status(&self) -> StatusCode {
        match self {
            ResourceError::InvalidArgument(_) | ResourceError::Mapping(_) => {
                StatusCode::BAD_REQUEST
            }
            ResourceError::MediaTypeNotSupported(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ResourceError::HandlerMissing(_)
            | ResourceError::IllegalState(_)
            | ResourceError::InvalidTemplate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(e: serde_json::Error) -> Self {
        ResourceError::Mapping(e.to_string())
    }
}

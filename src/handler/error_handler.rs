use crate::error::ResourceError;
use crate::response::Response;
use http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Turns a resolution or execution failure into a response.
#[derive(Clone)]
pub struct ErrorHandler {
    handler: Arc<dyn Fn(&ResourceError) -> Response + Send + Sync>,
}

impl ErrorHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ResourceError) -> Response + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Answers every failure with `status` and no entity.
    pub fn handle_all_with(status: StatusCode) -> Self {
        Self::new(move |_error| Response::with_status(status))
    }

    pub fn handle(&self, error: &ResourceError) -> Response {
        (self.handler)(error)
    }
}

/// Uses [`ResourceError::status`] and the error message as entity.
impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(|error| Response::of(error.status(), error.to_string()))
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler")
    }
}

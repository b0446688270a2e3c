use super::handler::ResourceHandler;
use crate::request::Request;
use crate::response::Response;
use actor_stage::Completes;
use http::Method;
use std::fmt;
use std::sync::Arc;

pub type DynamicFn = dyn Fn(&Request, &dyn ResourceHandler) -> Completes<Response> + Send + Sync;

/// A route served by a closure instead of a typed request handler.
///
/// The closure gets the raw request and the worker's [`ResourceHandler`]; it does its
/// own parameter extraction.
#[derive(Clone)]
pub struct DynamicHandler {
    pub method: Method,
    pub path: String,
    handler: Arc<DynamicFn>,
}

impl DynamicHandler {
    pub fn new<F>(method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&Request, &dyn ResourceHandler) -> Completes<Response> + Send + Sync + 'static,
    {
        Self {
            method,
            path: path.to_string(),
            handler: Arc::new(handler),
        }
    }

    pub(crate) fn handler(&self) -> Arc<DynamicFn> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for DynamicHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicHandler")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

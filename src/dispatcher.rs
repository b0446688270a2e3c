//! Routes requests across resources in registration order.

use crate::resource::{Context, Resource};
use crate::response::Response;
use http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    resources: Vec<Arc<Resource>>,
}

impl Dispatcher {
    pub fn new(resources: Vec<Arc<Resource>>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }

    /// Sends `context` to the first resource with a matching route. Unmatched requests
    /// complete with 404.
    pub fn dispatch_for(&self, context: Context) {
        let method = context.request.method.clone();
        let matched = self.resources.iter().find_map(|resource| {
            resource
                .match_with(&method, &context.request.uri)
                .map(|mapped| (resource, mapped))
        });

        match matched {
            Some((resource, mapped)) => {
                let completes = context.completes.clone();
                if let Err(e) = resource.dispatch_to_handler_with(context, mapped) {
                    warn!(resource = resource.name(), error = %e, "Dispatch failed");
                    completes.with(Response::of(e.status(), e.to_string()));
                }
            }
            None => {
                debug!(%method, uri = %context.request.uri, "No action matched");
                context
                    .completes
                    .with(Response::with_status(StatusCode::NOT_FOUND));
            }
        }
    }
}

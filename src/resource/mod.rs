//! # Resources
//!
//! A [`Resource`] groups routes under a name and owns a fixed pool of
//! [`ResourceRequestHandlerActor`] workers. Each matched request goes to the next slot in
//! round-robin order and waits in that slot's mailbox behind whatever is already queued
//! there. Pool size is the only concurrency limit.
//!
//! Routes are either typed ([`RouteHandler`], built with the fluent handler API) or
//! dynamic ([`DynamicHandler`], a closure over the raw request). One resource holds one
//! kind only.

mod dynamic;
mod handler;
mod worker;

pub use dynamic::{DynamicFn, DynamicHandler};
pub use handler::{Context, DefaultResourceHandler, ResourceHandler};
pub use worker::{Consumer, ResourceRequestHandlerActor};

use crate::action::{ActionMatcher, MappedParameters};
use crate::error::ResourceError;
use crate::handler::RouteHandler;
use crate::request::Request;
use actor_stage::{ActorRef, Stage};
use http::Method;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds the [`ResourceHandler`] for one pool slot.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn ResourceHandler> + Send + Sync>;

enum Routes {
    Typed(Vec<Arc<dyn RouteHandler>>),
    Dynamic(Vec<DynamicHandler>),
}

pub struct Resource {
    name: Arc<str>,
    handler_pool_size: Option<usize>,
    matcher: ActionMatcher,
    routes: Routes,
    handler_factory: HandlerFactory,
    handler_pool: OnceCell<Vec<ActorRef<ResourceRequestHandlerActor>>>,
    handler_pool_index: AtomicUsize,
}

impl Resource {
    pub fn builder(name: &str) -> ResourceBuilder {
        ResourceBuilder {
            name: name.to_string(),
            handler_pool_size: None,
            typed: Vec::new(),
            dynamic: Vec::new(),
            handler_factory: Arc::new(|| Box::new(DefaultResourceHandler) as Box<dyn ResourceHandler>),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pool size set on the builder, if any.
    pub fn handler_pool_size(&self) -> Option<usize> {
        self.handler_pool_size
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.routes, Routes::Dynamic(_))
    }

    pub fn matcher(&self) -> &ActionMatcher {
        &self.matcher
    }

    /// Starts the worker pool on `stage` the first time it is called. Later calls return
    /// the existing pool.
    pub fn allocate_handler_pool(
        &self,
        stage: &Stage,
        default_size: usize,
    ) -> &[ActorRef<ResourceRequestHandlerActor>] {
        self.handler_pool.get_or_init(|| {
            let size = self.handler_pool_size.unwrap_or(default_size).max(1);
            let pool = (0..size)
                .map(|slot| {
                    let worker = ResourceRequestHandlerActor::new(
                        Arc::clone(&self.name),
                        (self.handler_factory)(),
                    );
                    stage.actor_for(&format!("{}-{}", self.name, slot), worker)
                })
                .collect();
            self.log_routes(size);
            pool
        })
    }

    fn log_routes(&self, pool_size: usize) {
        info!(
            resource = %self.name,
            pool_size,
            routes = self.matcher.len(),
            dynamic = self.is_dynamic(),
            "Resource pool allocated"
        );
        match &self.routes {
            Routes::Typed(handlers) => {
                for handler in handlers {
                    debug!(
                        resource = %self.name,
                        method = %handler.method(),
                        path = handler.path(),
                        signature = %handler.action_signature(),
                        "Route"
                    );
                }
            }
            Routes::Dynamic(handlers) => {
                for handler in handlers {
                    debug!(
                        resource = %self.name,
                        method = %handler.method,
                        path = %handler.path,
                        "Route"
                    );
                }
            }
        }
    }

    /// The allocated workers, empty before allocation.
    pub fn handler_pool(&self) -> &[ActorRef<ResourceRequestHandlerActor>] {
        self.handler_pool.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The next worker in round-robin order.
    pub fn pooled_handler(&self) -> Result<&ActorRef<ResourceRequestHandlerActor>, ResourceError> {
        let pool = self.handler_pool.get().ok_or_else(|| {
            ResourceError::IllegalState(format!("Handler pool of {} not allocated", self.name))
        })?;
        let index = self
            .handler_pool_index
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1);
        Ok(&pool[index % pool.len()])
    }

    pub fn match_with(&self, method: &Method, uri: &str) -> Option<MappedParameters> {
        self.matcher.match_with(method, uri)
    }

    /// Hands a matched request to the next pooled worker.
    ///
    /// The response arrives later through `context.completes`. If the worker has
    /// stopped, the request becomes a dead letter and the completion stays pending.
    pub fn dispatch_to_handler_with(
        &self,
        context: Context,
        mapped: MappedParameters,
    ) -> Result<(), ResourceError> {
        let missing_route = || {
            ResourceError::IllegalState(format!(
                "No route {} in resource {}",
                mapped.action_id, self.name
            ))
        };
        let worker = self.pooled_handler()?;

        match &self.routes {
            Routes::Typed(handlers) => {
                let route = handlers.get(mapped.action_id).cloned().ok_or_else(missing_route)?;
                worker.tell(
                    "handle_for(Context, MappedParameters, RequestHandler)",
                    move |actor| actor.handle_for_route(context, mapped, route),
                );
            }
            Routes::Dynamic(handlers) => {
                let handler = handlers
                    .get(mapped.action_id)
                    .map(DynamicHandler::handler)
                    .ok_or_else(missing_route)?;
                let consumer: Consumer =
                    Box::new(move |request: &Request, resource: &dyn ResourceHandler| {
                        handler(request, resource)
                    });
                worker.tell("handle_for(Context, Consumer)", move |actor| {
                    actor.handle_for(context, consumer)
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("handler_pool_size", &self.handler_pool_size)
            .field("routes", &self.matcher.len())
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

pub struct ResourceBuilder {
    name: String,
    handler_pool_size: Option<usize>,
    typed: Vec<Arc<dyn RouteHandler>>,
    dynamic: Vec<DynamicHandler>,
    handler_factory: HandlerFactory,
}

impl ResourceBuilder {
    pub fn handler_pool_size(mut self, size: usize) -> Self {
        self.handler_pool_size = Some(size.max(1));
        self
    }

    /// Adds a typed route. Registration order decides between overlapping templates.
    pub fn route<R: RouteHandler + 'static>(mut self, route: R) -> Self {
        self.typed.push(Arc::new(route));
        self
    }

    pub fn dynamic_route(mut self, handler: DynamicHandler) -> Self {
        self.dynamic.push(handler);
        self
    }

    /// Supplies the per-slot [`ResourceHandler`]; `factory` runs once per slot.
    pub fn resource_handler<H, F>(mut self, factory: F) -> Self
    where
        H: ResourceHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.handler_factory = Arc::new(move || Box::new(factory()) as Box<dyn ResourceHandler>);
        self
    }

    /// Compiles every path template.
    pub fn build(self) -> Result<Resource, ResourceError> {
        if !self.typed.is_empty() && !self.dynamic.is_empty() {
            return Err(ResourceError::IllegalState(format!(
                "Resource {} mixes typed and dynamic routes",
                self.name
            )));
        }

        let (matcher, routes) = if self.dynamic.is_empty() {
            let matcher = ActionMatcher::compile(
                self.typed
                    .iter()
                    .map(|handler| (handler.method().clone(), handler.path())),
            )?;
            (matcher, Routes::Typed(self.typed))
        } else {
            let matcher = ActionMatcher::compile(
                self.dynamic
                    .iter()
                    .map(|handler| (handler.method.clone(), handler.path.as_str())),
            )?;
            (matcher, Routes::Dynamic(self.dynamic))
        };

        Ok(Resource {
            name: Arc::from(self.name),
            handler_pool_size: self.handler_pool_size,
            matcher,
            routes,
            handler_factory: self.handler_factory,
            handler_pool: OnceCell::new(),
            handler_pool_index: AtomicUsize::new(0),
        })
    }
}

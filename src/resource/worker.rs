use super::handler::{Context, ResourceHandler};
use crate::action::MappedParameters;
use crate::handler::RouteHandler;
use crate::request::Request;
use crate::response::Response;
use actor_stage::{Actor, Completes};
use http::StatusCode;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, warn};

/// Closure run by a dynamic route against the worker's handler.
pub type Consumer = Box<dyn FnOnce(&Request, &dyn ResourceHandler) -> Completes<Response> + Send>;

/// One pooled slot of a resource.
///
/// Requests reach it through its mailbox, so a slot serves one request at a time. The
/// request context is owned by the turn that serves it and dropped at its end.
pub struct ResourceRequestHandlerActor {
    resource: Arc<str>,
    handler: Box<dyn ResourceHandler>,
    served: u64,
}

impl Actor for ResourceRequestHandlerActor {}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl ResourceRequestHandlerActor {
    pub fn new(resource: Arc<str>, handler: Box<dyn ResourceHandler>) -> Self {
        Self {
            resource,
            handler,
            served: 0,
        }
    }

    /// Requests this slot has taken so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Resolves and executes a fluent route, completing `context` with its response.
    pub fn handle_for_route(
        &mut self,
        context: Context,
        mapped: MappedParameters,
        route: Arc<dyn RouteHandler>,
    ) {
        self.served += 1;
        let outcome = catch_unwind(AssertUnwindSafe(|| route.execute(&context.request, &mapped)));
        let completes = context.completes;
        match outcome {
            Ok(Ok(response)) => {
                response.and_finally_consume(move |response| {
                    completes.with(response.clone());
                });
            }
            Ok(Err(e)) => {
                warn!(
                    resource = %self.resource,
                    method = %route.method(),
                    path = route.path(),
                    error = %e,
                    "Request handler failed"
                );
                completes.with(route.error_handler().handle(&e));
            }
            Err(payload) => {
                error!(
                    resource = %self.resource,
                    method = %route.method(),
                    path = route.path(),
                    panic = panic_message(payload.as_ref()),
                    "Request handler panicked"
                );
                completes.with(Response::with_status(StatusCode::INTERNAL_SERVER_ERROR));
            }
        }
    }

    /// Runs a dynamic route's closure with this slot's handler.
    pub fn handle_for(&mut self, context: Context, consumer: Consumer) {
        self.served += 1;
        let handler = self.handler.as_ref();
        let outcome = catch_unwind(AssertUnwindSafe(|| consumer(&context.request, handler)));
        let completes = context.completes;
        match outcome {
            Ok(response) => {
                response.and_finally_consume(move |response| {
                    completes.with(response.clone());
                });
            }
            Err(payload) => {
                error!(
                    resource = %self.resource,
                    uri = %context.request.uri,
                    panic = panic_message(payload.as_ref()),
                    "Dynamic handler panicked"
                );
                completes.with(Response::with_status(StatusCode::INTERNAL_SERVER_ERROR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{get, ErrorHandler};
    use crate::resource::DefaultResourceHandler;
    use http::Method;

    fn worker() -> ResourceRequestHandlerActor {
        ResourceRequestHandlerActor::new(Arc::from("test"), Box::new(DefaultResourceHandler))
    }

    #[test]
    fn test_route_response_completes_context() {
        let route: Arc<dyn RouteHandler> = Arc::new(get("/ping").handle(|| {
            Completes::with_success(Response::of(StatusCode::OK, "pong"))
        }));
        let context = Context::new(Request::has(Method::GET).and_uri("/ping"));
        let completes = context.completes.clone();

        let mut worker = worker();
        worker.handle_for_route(context, MappedParameters::empty(Method::GET, "/ping"), route);

        assert_eq!(completes.outcome().unwrap().entity(), "pong");
        assert_eq!(worker.served(), 1);
    }

    #[test]
    fn test_route_error_goes_through_error_handler() {
        let route: Arc<dyn RouteHandler> = Arc::new(
            get("/ping").on_error(ErrorHandler::handle_all_with(StatusCode::SERVICE_UNAVAILABLE)),
        );
        let context = Context::new(Request::has(Method::GET).and_uri("/ping"));
        let completes = context.completes.clone();

        worker().handle_for_route(context, MappedParameters::empty(Method::GET, "/ping"), route);

        assert_eq!(completes.outcome().unwrap().status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_route_panic_is_a_server_error() {
        let route: Arc<dyn RouteHandler> =
            Arc::new(get("/boom").handle(|| -> Completes<Response> { panic!("boom") }));
        let context = Context::new(Request::has(Method::GET).and_uri("/boom"));
        let completes = context.completes.clone();

        let mut worker = worker();
        worker.handle_for_route(context, MappedParameters::empty(Method::GET, "/boom"), route);

        assert_eq!(
            completes.outcome().unwrap().status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_dynamic_consumer_sees_resource_handler() {
        let context = Context::new(Request::has(Method::GET).and_uri("/status"));
        let completes = context.completes.clone();

        worker().handle_for(
            context,
            Box::new(|request: &Request, handler: &dyn ResourceHandler| {
                Completes::with_success(handler.entity_response_of(StatusCode::OK, request.path()))
            }),
        );

        let response = completes.outcome().unwrap();
        assert_eq!(response.entity(), "/status");
        assert!(response.header_of("Content-Type").is_some());
    }
}

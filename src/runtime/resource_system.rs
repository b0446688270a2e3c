use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::request::Request;
use crate::resource::{Context, Resource};
use crate::response::Response;
use actor_stage::{Completes, DeadLetters, Stage, StageError};
use std::sync::Arc;
use tracing::info;

/// The runtime orchestrator for a set of resources.
///
/// `ResourceSystem` is responsible for:
/// - **Lifecycle Management**: starting every resource's worker pool on one [`Stage`]
///   and stopping them all on shutdown
/// - **Routing**: handing each request to the [`Dispatcher`]
/// - **Dead Letters**: exposing the stage-wide collector of undeliverable messages
///
/// # Example
///
/// ```rust
/// use resource_dispatch::handler::get;
/// use resource_dispatch::{Completes, Request, Resource, ResourceSystem, Response, ServerConfig};
/// use http::{Method, StatusCode};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let health = Resource::builder("health")
///     .route(get("/health").handle(|| {
///         Completes::with_success(Response::of(StatusCode::OK, "up"))
///     }))
///     .build()?;
///
/// let system = ResourceSystem::start(ServerConfig::default(), vec![health]);
/// let response = system
///     .dispatch(Request::has(Method::GET).and_uri("/health"))
///     .await_outcome()
///     .await;
/// assert_eq!(response.entity(), "up");
///
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct ResourceSystem {
    config: ServerConfig,
    stage: Stage,
    dispatcher: Dispatcher,
}

impl ResourceSystem {
    /// Creates the stage and allocates every resource's pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: ServerConfig, resources: Vec<Resource>) -> Self {
        let stage = Stage::with_options(
            "resources",
            config.mailbox,
            DeadLetters::new(config.dead_letter_capacity),
        );

        let resources: Vec<Arc<Resource>> = resources.into_iter().map(Arc::new).collect();
        for resource in &resources {
            resource.allocate_handler_pool(&stage, config.handler_pool_size);
        }

        info!(
            resources = resources.len(),
            workers = stage.actor_count(),
            mailbox = ?config.mailbox,
            "Resource system started"
        );

        Self {
            config,
            stage,
            dispatcher: Dispatcher::new(resources),
        }
    }

    /// Routes `request` and returns the handle its response will arrive on.
    pub fn dispatch(&self, request: Request) -> Completes<Response> {
        let context = Context::new(request);
        let completes = context.completes.clone();
        self.dispatcher.dispatch_for(context);
        completes
    }

    pub fn resource_named(&self, name: &str) -> Option<&Arc<Resource>> {
        self.dispatcher
            .resources()
            .iter()
            .find(|resource| resource.name() == name)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn dead_letters(&self) -> &DeadLetters {
        self.stage.dead_letters()
    }

    /// Stops every worker once its queued requests are done and waits for all of them.
    pub async fn shutdown(self) -> Result<(), StageError> {
        info!("Shutting down resource system...");
        self.stage.shutdown().await?;
        info!("Resource system shutdown complete.");
        Ok(())
    }
}

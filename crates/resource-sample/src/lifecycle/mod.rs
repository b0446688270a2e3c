//! # System Lifecycle & Orchestration
//!
//! [`ProfileSystem`] wires the sample together:
//!
//! 1. **Service stage** - starts the profile store actor on its own stage
//! 2. **Dependency injection** - hands the store client and one shared
//!    [`MediaTypeMapper`] to the routes
//! 3. **Resource system** - allocates the worker pools and serves requests
//! 4. **Graceful shutdown** - stops the request workers first, then the store
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use resource_dispatch::{Request, ServerConfig};
//! use resource_sample::lifecycle::ProfileSystem;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = ProfileSystem::start(ServerConfig::default())?;
//!     let response = system
//!         .dispatch(Request::has(Method::GET).and_uri("/health"))
//!         .await_outcome()
//!         .await;
//!     assert_eq!(response.status, StatusCode::OK);
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::profile_resource::{health_resource, profile_resource};
use crate::profile_store::{ProfileStore, ProfileStoreActor};
use actor_stage::{Completes, Stage, StageError};
use resource_dispatch::{
    MediaTypeMapper, Request, ResourceError, ResourceSystem, Response, ServerConfig,
};
use std::sync::Arc;
use tracing::info;

pub struct ProfileSystem {
    /// Client for the profile store actor
    pub store: ProfileStore,

    service: Stage,
    resources: ResourceSystem,
}

impl ProfileSystem {
    /// Starts the store and every resource.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: ServerConfig) -> Result<Self, ResourceError> {
        let service = Stage::new("service");
        let store = ProfileStore::new(service.actor_for("profile-store", ProfileStoreActor::default()));
        let media_type_mapper = Arc::new(MediaTypeMapper::with_defaults());

        let resources = ResourceSystem::start(
            config,
            vec![
                profile_resource(store.clone(), media_type_mapper)?,
                health_resource()?,
            ],
        );
        info!("Profile system started");

        Ok(Self {
            store,
            service,
            resources,
        })
    }

    pub fn dispatch(&self, request: Request) -> Completes<Response> {
        self.resources.dispatch(request)
    }

    pub fn resources(&self) -> &ResourceSystem {
        &self.resources
    }

    pub async fn shutdown(self) -> Result<(), StageError> {
        info!("Shutting down profile system...");
        self.resources.shutdown().await?;
        self.service.shutdown().await?;
        info!("Profile system shutdown complete.");
        Ok(())
    }
}

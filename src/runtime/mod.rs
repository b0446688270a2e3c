//! Runtime orchestration and lifecycle management.
//!
//! - [`ResourceSystem`] - starts resource pools on a stage, dispatches requests, shuts
//!   everything down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod resource_system;

pub use actor_stage::tracing::setup_tracing;
pub use resource_system::ResourceSystem;

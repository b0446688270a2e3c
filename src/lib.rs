#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Resource Dispatch
//!
//! > **Request routing and pooled asynchronous dispatch for HTTP resources.**
//!
//! This crate takes an already parsed [`Request`], finds the route it belongs to,
//! resolves the route's typed parameters from the path, query string, headers or body,
//! and runs the route's function on one worker of a fixed pool. The caller gets a
//! [`Completes<Response>`](Completes) immediately; the response arrives through it once
//! the worker is done.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Routes are values
//! A route is built once with a fluent chain and never mutated afterwards. Every
//! `.param`, `.body`, `.query` or `.header` call returns a handler of the next arity, up
//! to five parameters, so the bound function's signature is checked by the compiler.
//!
//! ### Workers are actors
//! Each resource owns a pool of actors from the `actor-stage` crate. A worker takes one
//! request at a time from its mailbox; different workers run in parallel. Requests are
//! spread round robin. A request sent to a stopped worker is recorded as a dead letter
//! and its completion is left pending.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Matching ([`action`])
//! `{name}` path templates compiled into an [`ActionMatcher`]. First registered wins.
//!
//! ### 2. Parameters ([`resolver`], [`handler`])
//! [`ParameterResolver`] extracts one typed value. [`RequestHandler0`] through
//! [`RequestHandler5`] bind resolvers to a function; [`ErrorHandler`] turns failures into
//! responses.
//!
//! ### 3. Payloads ([`mapper`], [`media_type_mapper`], [`media`])
//! Bodies are mapped by their base media type through a [`MediaTypeMapper`] built once
//! at startup.
//!
//! ### 4. Execution ([`resource`], [`dispatcher`], [`runtime`])
//! [`Resource`] pools, the [`Dispatcher`] across resources, and the [`ResourceSystem`]
//! that starts and stops it all.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the sample profile service with info logs
//! RUST_LOG=info cargo run -p resource-sample
//! ```
//!
//! Configuration is read from the environment, see [`config`].

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod media;
pub mod media_type_mapper;
pub mod request;
pub mod resolver;
pub mod resource;
pub mod response;
pub mod runtime;

pub use action::{Action, ActionMatcher, MappedParameter, MappedParameters, PathTemplate};
pub use actor_stage::Completes;
pub use config::ServerConfig;
pub use dispatcher::Dispatcher;
pub use error::ResourceError;
pub use handler::{
    ErrorHandler, RequestHandler0, RequestHandler1, RequestHandler2, RequestHandler3,
    RequestHandler4, RequestHandler5, RouteHandler,
};
pub use mapper::{JsonMapper, Mapper, MapperExt, TextMapper};
pub use media::{ContentMediaType, ContentType};
pub use media_type_mapper::{MediaTypeMapper, MediaTypeMapperBuilder};
pub use request::{Body, Header, QueryParameters, Request, Version};
pub use resolver::{ParameterResolver, PathValue, QueryValue, ResolverKind};
pub use resource::{
    Context, DefaultResourceHandler, DynamicHandler, Resource, ResourceBuilder, ResourceHandler,
};
pub use response::Response;
pub use runtime::{setup_tracing, ResourceSystem};

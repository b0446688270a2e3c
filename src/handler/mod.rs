//! Route handlers.
//!
//! A route starts as a [`RequestHandler0`] from one of the method functions below and
//! grows one parameter at a time. Each fluent call returns a handler of the next arity
//! that carries the resolvers already bound:
//!
//! ```rust
//! use resource_dispatch::handler::{get, RouteHandler};
//! use resource_dispatch::{Completes, Response};
//! use http::StatusCode;
//!
//! let route = get("/posts/{postId}/comment/{commentId}")
//!     .param::<String>()
//!     .param::<String>()
//!     .query_or("page", 1i32)
//!     .handle(|post_id, comment_id, page| {
//!         Completes::with_success(Response::of(
//!             StatusCode::OK,
//!             format!("{} {} {}", post_id, comment_id, page),
//!         ))
//!     });
//!
//! assert_eq!(route.action_signature(), "String postId, String commentId");
//! ```
//!
//! Handlers are built once and shared by every worker, so the bound function must not
//! keep per-request state.

mod error_handler;
mod request_handler;

pub use error_handler::ErrorHandler;
pub use request_handler::*;

use crate::action::{placeholder_names_of, MappedParameters};
use crate::error::ResourceError;
use crate::request::Request;
use crate::resolver::ResolverKind;
use crate::response::Response;
use actor_stage::Completes;
use http::Method;

/// A bound route as seen by the resource that owns it.
pub trait RouteHandler: Send + Sync {
    fn method(&self) -> &Method;

    /// The path template this handler was registered with.
    fn path(&self) -> &str;

    /// Resolves every parameter in declaration order, then calls the bound function.
    fn execute(
        &self,
        request: &Request,
        mapped: &MappedParameters,
    ) -> Result<Completes<Response>, ResourceError>;

    fn error_handler(&self) -> &ErrorHandler;

    /// Path parameters as `"Type name"`, comma separated. Body, query and header
    /// parameters are left out.
    fn action_signature(&self) -> String;
}

pub(crate) fn signature_of(path: &str, resolvers: &[(ResolverKind, &'static str, Option<usize>)]) -> String {
    let names = placeholder_names_of(path);
    resolvers
        .iter()
        .filter(|(kind, _, _)| *kind == ResolverKind::Path)
        .map(|(_, type_name, position)| {
            let name = position
                .and_then(|position| names.get(position))
                .map_or("", String::as_str);
            format!("{} {}", type_name, name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn get(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::GET, path)
}

pub fn post(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::POST, path)
}

pub fn put(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::PUT, path)
}

pub fn patch(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::PATCH, path)
}

pub fn delete(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::DELETE, path)
}

pub fn head(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::HEAD, path)
}

pub fn options(path: &str) -> RequestHandler0 {
    RequestHandler0::new(Method::OPTIONS, path)
}

use super::{signature_of, ErrorHandler, RouteHandler};
use crate::action::MappedParameters;
use crate::error::ResourceError;
use crate::mapper::Mapper;
use crate::media_type_mapper::MediaTypeMapper;
use crate::request::{Header, Request};
use crate::resolver::{ParameterResolver, PathValue, QueryValue, ResolverKind};
use crate::response::Response;
use actor_stage::Completes;
use http::Method;
use paste::paste;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// One handler type per arity. Resolvers are stored in declaration order as
/// `resolver_param1..N` and the bound function takes the resolved values in that order.
macro_rules! request_handler {
    ($arity:tt $(, $t:ident $i:tt)*) => {
        paste! {
            pub type [<Handler $arity>]<$($t),*> =
                dyn Fn($($t),*) -> Completes<Response> + Send + Sync;

            pub struct [<RequestHandler $arity>]<$($t),*> {
                method: Method,
                path: String,
                $( [<resolver_param $i>]: ParameterResolver<$t>, )*
                handler: Option<Arc<[<Handler $arity>]<$($t),*>>>,
                error_handler: ErrorHandler,
                media_type_mapper: Arc<MediaTypeMapper>,
            }

            impl<$($t: 'static),*> [<RequestHandler $arity>]<$($t),*> {
                /// Binds the function that receives the resolved parameters.
                pub fn handle<F>(mut self, handler: F) -> Self
                where
                    F: Fn($($t),*) -> Completes<Response> + Send + Sync + 'static,
                {
                    self.handler = Some(Arc::new(handler));
                    self
                }

                pub fn on_error(mut self, error_handler: ErrorHandler) -> Self {
                    self.error_handler = error_handler;
                    self
                }

                /// Mapper used by `body` parameters added after this call.
                pub fn with_media_type_mapper(mut self, media_type_mapper: Arc<MediaTypeMapper>) -> Self {
                    self.media_type_mapper = media_type_mapper;
                    self
                }

                /// Calls the bound function with already resolved parameters.
                pub fn execute_with(
                    &self,
                    $( [<param $i>]: $t, )*
                ) -> Result<Completes<Response>, ResourceError> {
                    match &self.handler {
                        Some(handler) => Ok(handler($( [<param $i>] ),*)),
                        None => Err(ResourceError::handler_missing(&self.method, &self.path)),
                    }
                }

                fn resolvers(&self) -> Vec<(ResolverKind, &'static str, Option<usize>)> {
                    vec![$(
                        (
                            self.[<resolver_param $i>].kind(),
                            self.[<resolver_param $i>].type_name(),
                            self.[<resolver_param $i>].position(),
                        )
                    ),*]
                }

                #[allow(dead_code)]
                fn path_param_count(&self) -> usize {
                    self.resolvers()
                        .iter()
                        .filter(|(kind, _, _)| *kind == ResolverKind::Path)
                        .count()
                }
            }

            impl<$($t: 'static),*> RouteHandler for [<RequestHandler $arity>]<$($t),*> {
                fn method(&self) -> &Method {
                    &self.method
                }

                fn path(&self) -> &str {
                    &self.path
                }

                #[allow(unused_variables)]
                fn execute(
                    &self,
                    request: &Request,
                    mapped: &MappedParameters,
                ) -> Result<Completes<Response>, ResourceError> {
                    $( let [<param $i>] = self.[<resolver_param $i>].apply(request, mapped)?; )*
                    self.execute_with($( [<param $i>] ),*)
                }

                fn error_handler(&self) -> &ErrorHandler {
                    &self.error_handler
                }

                fn action_signature(&self) -> String {
                    signature_of(&self.path, &self.resolvers())
                }
            }
        }
    };
}

/// Fluent calls that turn a handler of one arity into the next.
macro_rules! fluent_params {
    ($arity:tt => $next:tt $(, $t:ident $i:tt)*) => {
        paste! {
            impl<$($t: 'static),*> [<RequestHandler $arity>]<$($t),*> {
                /// Appends `resolver` as the next parameter. Any bound function is dropped.
                pub fn and_param<U: 'static>(
                    self,
                    resolver: ParameterResolver<U>,
                ) -> [<RequestHandler $next>]<$($t,)* U> {
                    [<RequestHandler $next>] {
                        method: self.method,
                        path: self.path,
                        $( [<resolver_param $i>]: self.[<resolver_param $i>], )*
                        [<resolver_param $next>]: resolver,
                        handler: None,
                        error_handler: self.error_handler,
                        media_type_mapper: self.media_type_mapper,
                    }
                }

                /// The next path placeholder, coerced to `U`.
                pub fn param<U: PathValue + 'static>(self) -> [<RequestHandler $next>]<$($t,)* U> {
                    let position = self.path_param_count();
                    self.and_param(ParameterResolver::<U>::path(position))
                }

                /// The body, mapped by its `Content-Type`.
                pub fn body<U: DeserializeOwned + 'static>(self) -> [<RequestHandler $next>]<$($t,)* U> {
                    let media_type_mapper = Arc::clone(&self.media_type_mapper);
                    self.and_param(ParameterResolver::<U>::body(media_type_mapper))
                }

                pub fn body_with<U: DeserializeOwned + 'static>(
                    self,
                    mapper: Arc<dyn Mapper>,
                ) -> [<RequestHandler $next>]<$($t,)* U> {
                    self.and_param(ParameterResolver::<U>::body_with_mapper(mapper))
                }

                pub fn query(self, name: &str) -> [<RequestHandler $next>]<$($t,)* Option<String>> {
                    self.and_param(ParameterResolver::<Option<String>>::query(name))
                }

                pub fn query_as<U: QueryValue + 'static>(
                    self,
                    name: &str,
                ) -> [<RequestHandler $next>]<$($t,)* Option<U>> {
                    self.and_param(ParameterResolver::<Option<U>>::query_as(name))
                }

                pub fn query_or<U: QueryValue + Clone + Send + Sync + 'static>(
                    self,
                    name: &str,
                    default: U,
                ) -> [<RequestHandler $next>]<$($t,)* U> {
                    self.and_param(ParameterResolver::<U>::query_or(name, default))
                }

                pub fn header(self, name: &str) -> [<RequestHandler $next>]<$($t,)* Option<Header>> {
                    self.and_param(ParameterResolver::<Option<Header>>::header(name))
                }
            }
        }
    };
}

request_handler!(0);
request_handler!(1, T1 1);
request_handler!(2, T1 1, T2 2);
request_handler!(3, T1 1, T2 2, T3 3);
request_handler!(4, T1 1, T2 2, T3 3, T4 4);
request_handler!(5, T1 1, T2 2, T3 3, T4 4, T5 5);

fluent_params!(0 => 1);
fluent_params!(1 => 2, T1 1);
fluent_params!(2 => 3, T1 1, T2 2);
fluent_params!(3 => 4, T1 1, T2 2, T3 3);
fluent_params!(4 => 5, T1 1, T2 2, T3 3, T4 4);

impl RequestHandler0 {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            handler: None,
            error_handler: ErrorHandler::default(),
            media_type_mapper: Arc::new(MediaTypeMapper::with_defaults()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, MappedParameter};
    use crate::handler::{get, post};
    use crate::request::CONTENT_TYPE;
    use http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NameData {
        given: String,
        family: String,
    }

    fn ok(entity: String) -> Completes<Response> {
        Completes::with_success(Response::of(StatusCode::OK, entity))
    }

    fn entity_of(completes: Completes<Response>) -> String {
        completes.outcome().unwrap().entity().to_string()
    }

    fn mapped_posts() -> MappedParameters {
        MappedParameters::new(
            1,
            Method::GET,
            "ignored",
            vec![
                MappedParameter::new("String", "my-post"),
                MappedParameter::new("String", "my-comment"),
                MappedParameter::new("String", "admin"),
            ],
        )
    }

    #[test]
    fn test_missing_handler_names_method_and_template() {
        let handler = get("/posts/{postId}/comment/{commentId}/user/{userId}")
            .param::<String>()
            .param::<String>()
            .param::<String>();
        let error = handler
            .execute_with("my-post".into(), "my-comment".into(), "admin".into())
            .unwrap_err();
        assert_eq!(
            error,
            ResourceError::HandlerMissing(
                "No handler defined for GET /posts/{postId}/comment/{commentId}/user/{userId}"
                    .into()
            )
        );
        assert!(matches!(
            handler.execute(&Request::has(Method::GET), &mapped_posts()),
            Err(ResourceError::HandlerMissing(_))
        ));
    }

    #[test]
    fn test_execute_resolves_in_declaration_order() {
        let handler = get("/posts/{postId}/comment/{commentId}/user/{userId}")
            .param::<String>()
            .param::<String>()
            .param::<String>()
            .handle(|post, comment, user| ok(format!("{} {} {}", post, comment, user)));
        let completes = handler
            .execute(&Request::has(Method::GET), &mapped_posts())
            .unwrap();
        assert_eq!(entity_of(completes), "my-post my-comment admin");
    }

    #[test]
    fn test_action_signature_lists_path_parameters_only() {
        let handler = post("/posts/{postId}/comment/{commentId}")
            .param::<String>()
            .body::<NameData>()
            .param::<i32>()
            .header("Authorization")
            .query("page");
        assert_eq!(handler.action_signature(), "String postId, i32 commentId");
        assert_eq!(get("/health").action_signature(), "");
    }

    #[test]
    fn test_param_positions_skip_other_kinds() {
        let action = Action::new(0, Method::POST, "/groups/{groupId}/members/{memberId}").unwrap();
        let mapped = action
            .match_with(&Method::POST, "/groups/g1/members/42?role=owner")
            .unwrap();
        let request = Request::has(Method::POST)
            .and_uri("/groups/g1/members/42?role=owner")
            .header("X-Tenant", "acme")
            .body(r#"{"given":"Ann","family":"Lee"}"#);

        let handler = post("/groups/{groupId}/members/{memberId}")
            .param::<String>()
            .body::<NameData>()
            .param::<u64>()
            .query_or("role", String::from("member"))
            .header("x-tenant")
            .handle(|group, name, member, role, tenant| {
                ok(format!(
                    "{} {} {} {} {} {}",
                    group,
                    name.given,
                    name.family,
                    member,
                    role,
                    tenant.map(|h| h.value).unwrap_or_default()
                ))
            });

        let completes = handler.execute(&request, &mapped).unwrap();
        assert_eq!(entity_of(completes), "g1 Ann Lee 42 owner acme");
    }

    #[test]
    fn test_resolution_failure_is_returned() {
        let handler = get("/posts/{postId}")
            .param::<i64>()
            .handle(|id| ok(id.to_string()));
        let mapped = MappedParameters::new(
            0,
            Method::GET,
            "/posts/abc",
            vec![MappedParameter::new("String", "abc")],
        );
        let error = handler.execute(&Request::has(Method::GET), &mapped).unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_uses_handler_media_type_mapper() {
        let media_type_mapper = Arc::new(MediaTypeMapper::builder().build());
        let handler = post("/names")
            .with_media_type_mapper(media_type_mapper)
            .body::<NameData>()
            .handle(|name| ok(name.given));
        let request = Request::has(Method::POST)
            .header(CONTENT_TYPE, "application/json")
            .body(r#"{"given":"Ann","family":"Lee"}"#);
        let error = handler
            .execute(&request, &MappedParameters::empty(Method::POST, "/names"))
            .unwrap_err();
        assert!(matches!(error, ResourceError::MediaTypeNotSupported(_)));
    }

    #[test]
    fn test_custom_error_handler_is_kept_across_params() {
        let handler = get("/posts/{postId}")
            .on_error(ErrorHandler::handle_all_with(StatusCode::NOT_FOUND))
            .param::<String>();
        let response = handler
            .error_handler()
            .handle(&ResourceError::InvalidArgument("x".into()));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_zero_arity_handler() {
        let handler = get("/health").handle(|| ok("up".to_string()));
        let completes = handler
            .execute(&Request::has(Method::GET), &MappedParameters::empty(Method::GET, "/health"))
            .unwrap();
        assert_eq!(entity_of(completes), "up");
        assert_eq!(handler.method(), &Method::GET);
        assert_eq!(handler.path(), "/health");
    }
}

use crate::media::ContentType;
use crate::request::Request;
use crate::response::Response;
use actor_stage::Completes;
use http::StatusCode;

/// One request in flight: the request and the handle its response goes to.
#[derive(Debug, Clone)]
pub struct Context {
    pub request: Request,
    pub completes: Completes<Response>,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            completes: Completes::new(),
        }
    }

    pub fn with_completes(request: Request, completes: Completes<Response>) -> Self {
        Self { request, completes }
    }
}

/// Behaviour shared by every pooled worker of a resource.
///
/// One instance lives in each pool slot and serves many requests in turn, so it must
/// not keep anything that outlives a single request.
pub trait ResourceHandler: Send + 'static {
    fn content_type(&self) -> ContentType {
        ContentType::of("text/plain", "us-ascii")
    }

    /// `entity` with a `Content-Type` header from [`content_type`](Self::content_type).
    fn entity_response_of(&self, status: StatusCode, entity: &str) -> Response {
        Response::of(status, entity).and_header(self.content_type().to_response_header())
    }
}

#[derive(Debug, Default)]
pub struct DefaultResourceHandler;

impl ResourceHandler for DefaultResourceHandler {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::CONTENT_TYPE;

    struct JsonHandler;

    impl ResourceHandler for JsonHandler {
        fn content_type(&self) -> ContentType {
            ContentType::of("application/json", "utf-8")
        }
    }

    #[test]
    fn test_default_content_type_is_ascii_text() {
        let response = DefaultResourceHandler.entity_response_of(StatusCode::OK, "hi");
        assert_eq!(
            response.header_of(CONTENT_TYPE).unwrap().value,
            "text/plain; charset=us-ascii"
        );
        assert_eq!(response.entity(), "hi");
    }

    #[test]
    fn test_content_type_override() {
        let response = JsonHandler.entity_response_of(StatusCode::CREATED, "{}");
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(
            response.header_of("content-type").unwrap().value,
            "application/json; charset=utf-8"
        );
    }
}

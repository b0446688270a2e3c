use actor_stage::{MailboxKind, StageError};
use http::{Method, StatusCode};
use resource_dispatch::handler::{get, post};
use resource_dispatch::{
    Completes, DynamicHandler, ErrorHandler, Request, Resource, ResourceSystem, Response,
    ServerConfig,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct NameData {
    given: String,
    family: String,
}

fn ok(entity: String) -> Completes<Response> {
    Completes::with_success(Response::of(StatusCode::OK, entity))
}

fn posts_resource() -> Resource {
    Resource::builder("posts")
        .route(
            get("/posts/{postId}/comment/{commentId}")
                .param::<String>()
                .param::<String>()
                .handle(|post_id, comment_id| ok(format!("{} {}", post_id, comment_id))),
        )
        .route(
            get("/posts")
                .query_or("page", 1i32)
                .query_or("size", 20i32)
                .handle(|page, size| ok(format!("page {} size {}", page, size))),
        )
        .route(
            post("/names")
                .body::<NameData>()
                .handle(|name| ok(format!("{}, {}", name.family, name.given))),
        )
        .route(
            get("/numbers/{n}")
                .param::<u32>()
                .on_error(ErrorHandler::handle_all_with(StatusCode::UNPROCESSABLE_ENTITY))
                .handle(|n| ok((n * 2).to_string())),
        )
        .route(get("/unbound/{id}").param::<String>())
        .route(get("/explode").handle(|| -> Completes<Response> { panic!("exploded") }))
        .handler_pool_size(3)
        .build()
        .unwrap()
}

fn start() -> ResourceSystem {
    ResourceSystem::start(ServerConfig::default(), vec![posts_resource()])
}

async fn send(system: &ResourceSystem, request: Request) -> Response {
    system
        .dispatch(request)
        .await_outcome_timeout(Duration::from_secs(5))
        .await
        .expect("response within timeout")
}

#[tokio::test]
async fn test_path_parameters_reach_handler() {
    let system = start();
    let response = send(
        &system,
        Request::has(Method::GET).and_uri("/posts/my-post/comment/my-comment"),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.entity(), "my-post my-comment");
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_query_defaults_for_absent_and_malformed_values() {
    let system = start();
    let cases = [
        ("/posts", "page 1 size 20"),
        ("/posts?page=abc", "page 1 size 20"),
        ("/posts?page=3&size=x", "page 3 size 20"),
        ("/posts?size=5&page=2", "page 2 size 5"),
    ];
    for (uri, expected) in cases {
        let response = send(&system, Request::has(Method::GET).and_uri(uri)).await;
        assert_eq!(response.entity(), expected, "uri {}", uri);
    }
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_body_without_content_type_is_read_as_json() {
    let system = start();
    let request = Request::has(Method::POST)
        .and_uri("/names")
        .body(r#"{"given":"John","family":"Doe"}"#);
    assert!(request.header_of("Content-Type").is_none());

    let response = send(&system, request).await;
    assert_eq!(response.entity(), "Doe, John");
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unsupported_body_media_type_is_415() {
    let system = start();
    let request = Request::has(Method::POST)
        .and_uri("/names")
        .header("Content-Type", "application/xml")
        .body("<name/>");
    let response = send(&system, request).await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_route_error_handler_shapes_response() {
    let system = start();
    let good = send(&system, Request::has(Method::GET).and_uri("/numbers/21")).await;
    assert_eq!(good.entity(), "42");

    let bad = send(&system, Request::has(Method::GET).and_uri("/numbers/many")).await;
    assert_eq!(bad.status, StatusCode::UNPROCESSABLE_ENTITY);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unbound_route_reports_handler_missing() {
    let system = start();
    let response = send(&system, Request::has(Method::GET).and_uri("/unbound/7")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.entity(), "No handler defined for GET /unbound/{id}");
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_panic_is_isolated_to_its_request() {
    let system = start();
    for _ in 0..3 {
        let response = send(&system, Request::has(Method::GET).and_uri("/explode")).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
    // Every slot has panicked once and still serves.
    let response = send(
        &system,
        Request::has(Method::GET).and_uri("/posts/a/comment/b"),
    )
    .await;
    assert_eq!(response.entity(), "a b");
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unmatched_request_is_404() {
    let system = start();
    let response = send(&system, Request::has(Method::DELETE).and_uri("/posts")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dynamic_resource_after_typed_resource() {
    let health = Resource::builder("health")
        .dynamic_route(DynamicHandler::new(Method::GET, "/health", |_, handler| {
            Completes::with_success(handler.entity_response_of(StatusCode::OK, "up"))
        }))
        .dynamic_route(DynamicHandler::new(
            Method::GET,
            "/health/{component}",
            |request, handler| {
                let component = request.path().trim_start_matches("/health/").to_string();
                Completes::with_success(handler.entity_response_of(StatusCode::OK, &component))
            },
        ))
        .build()
        .unwrap();
    let system = ResourceSystem::start(ServerConfig::default(), vec![posts_resource(), health]);

    let response = send(&system, Request::has(Method::GET).and_uri("/health")).await;
    assert_eq!(response.entity(), "up");
    assert_eq!(
        response.header_of("Content-Type").unwrap().value,
        "text/plain; charset=us-ascii"
    );

    let response = send(&system, Request::has(Method::GET).and_uri("/health/db")).await;
    assert_eq!(response.entity(), "db");
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_request_to_stopped_worker_is_dead_lettered() {
    let system = start();
    let resource = system.resource_named("posts").unwrap();
    for worker in resource.handler_pool() {
        assert!(worker.stop());
    }

    let completes = system.dispatch(Request::has(Method::GET).and_uri("/posts/a/comment/b"));

    assert!(!completes.is_completed());
    assert!(completes
        .await_outcome_timeout(Duration::from_millis(100))
        .await
        .is_none());

    let dead_letters = system.dead_letters().snapshot();
    assert_eq!(dead_letters.len(), 1);
    assert_eq!(
        dead_letters[0].representation,
        "handle_for(Context, MappedParameters, RequestHandler)"
    );
    assert_eq!(dead_letters[0].reason, StageError::ActorStopped);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_preallocated_mailboxes_serve_requests() {
    let config = ServerConfig::new(2, MailboxKind::Preallocated { capacity: 16 }, 10);
    let system = ResourceSystem::start(config, vec![posts_resource()]);

    let pending: Vec<_> = (0..10)
        .map(|i| {
            system.dispatch(
                Request::has(Method::GET).and_uri(&format!("/posts/p{}/comment/c{}", i, i)),
            )
        })
        .collect();
    for (i, completes) in pending.iter().enumerate() {
        let response = completes.await_outcome().await;
        assert_eq!(response.entity(), format!("p{} c{}", i, i));
    }
    assert!(system.dead_letters().is_empty());
    system.shutdown().await.unwrap();
}

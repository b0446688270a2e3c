use actor_stage::tracing::setup_tracing;
use http::Method;
use resource_dispatch::{Request, Response, ServerConfig};
use resource_sample::lifecycle::ProfileSystem;
use tracing::{info, Instrument};

async fn send(system: &ProfileSystem, request: Request) -> Response {
    let span = tracing::info_span!("request", method = %request.method, uri = %request.uri);
    async {
        let response = system.dispatch(request).await_outcome().await;
        info!(status = %response.status, entity = response.entity(), "Response");
        response
    }
    .instrument(span)
    .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ServerConfig::from_env();
    info!(?config, "Starting profile service");
    let system = ProfileSystem::start(config)?;

    send(&system, Request::has(Method::GET).and_uri("/health")).await;
    send(&system, Request::has(Method::GET).and_uri("/users/42/profile")).await;

    let body = r#"{"twitter_account":"@jane","linked_in_account":"jane-doe","website":"https://jane.dev"}"#;
    send(
        &system,
        Request::has(Method::PUT)
            .and_uri("/users/42/profile")
            .header("Content-Type", "application/json")
            .body(body),
    )
    .await;
    // Defined again: the existing profile is returned with its location
    send(
        &system,
        Request::has(Method::PUT).and_uri("/users/42/profile").body(body),
    )
    .await;
    send(&system, Request::has(Method::GET).and_uri("/users/42/profile")).await;
    send(&system, Request::has(Method::GET).and_uri("/users/42/posts")).await;

    system.shutdown().await?;
    info!("Done");
    Ok(())
}

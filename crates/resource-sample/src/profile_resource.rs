//! # Profile Resource
//!
//! Routes for user profiles plus a small dynamic health resource.
//!
//! | Route | Outcome |
//! |-------|---------|
//! | `PUT /users/{userId}/profile` | `201` with the new profile, or `200` with the existing one and a `Location` header |
//! | `GET /users/{userId}/profile` | `200` with the profile, or `404` with its location |
//! | `GET /health` | `200 up` |
//!
//! Handlers only hold a [`ProfileStore`] client; all profile state lives in the store
//! actor.

use crate::model::{profile_location, Profile, ProfileData};
use crate::profile_store::{Defined, ProfileStore};
use http::{Method, StatusCode};
use resource_dispatch::handler::{get, put};
use resource_dispatch::request::LOCATION;
use resource_dispatch::{
    Completes, ContentMediaType, ContentType, DynamicHandler, Header, MediaTypeMapper, Resource,
    ResourceError, ResourceHandler, Response,
};
use std::sync::Arc;
use tracing::warn;

fn json_response(
    media_type_mapper: &MediaTypeMapper,
    status: StatusCode,
    profile: &Profile,
) -> Response {
    match media_type_mapper.to_string(&ProfileData::from(profile), &ContentMediaType::json()) {
        Ok(entity) => Response::of(status, entity)
            .and_header(ContentType::of("application/json", "utf-8").to_response_header()),
        Err(e) => {
            warn!(user_id = %profile.user_id, error = %e, "Profile serialization failed");
            Response::of(e.status(), e.to_string())
        }
    }
}

fn define(
    store: &ProfileStore,
    media_type_mapper: Arc<MediaTypeMapper>,
    user_id: String,
    data: ProfileData,
) -> Completes<Response> {
    match store.define(user_id, data) {
        Ok(defined) => defined.map(move |defined| match defined {
            Defined::Created(profile) => {
                json_response(&media_type_mapper, StatusCode::CREATED, profile)
            }
            Defined::Existing(profile) => {
                json_response(&media_type_mapper, StatusCode::OK, profile)
                    .and_header(Header::of(LOCATION, &profile.location()))
            }
        }),
        Err(e) => Completes::with_success(Response::of(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

fn query(
    store: &ProfileStore,
    media_type_mapper: Arc<MediaTypeMapper>,
    user_id: String,
) -> Completes<Response> {
    let location = profile_location(&user_id);
    store.profile_of(user_id).map(move |profile| match profile {
        Some(profile) => json_response(&media_type_mapper, StatusCode::OK, profile),
        None => Response::of(StatusCode::NOT_FOUND, location),
    })
}

/// The profile routes, backed by `store`.
pub fn profile_resource(
    store: ProfileStore,
    media_type_mapper: Arc<MediaTypeMapper>,
) -> Result<Resource, ResourceError> {
    let define_store = store.clone();
    let define_mapper = Arc::clone(&media_type_mapper);
    let query_mapper = Arc::clone(&media_type_mapper);

    Resource::builder("profile")
        .route(
            put("/users/{userId}/profile")
                .with_media_type_mapper(media_type_mapper)
                .param::<String>()
                .body::<ProfileData>()
                .handle(move |user_id, data| {
                    define(&define_store, Arc::clone(&define_mapper), user_id, data)
                }),
        )
        .route(
            get("/users/{userId}/profile")
                .param::<String>()
                .handle(move |user_id| query(&store, Arc::clone(&query_mapper), user_id)),
        )
        .build()
}

struct HealthHandler;

impl ResourceHandler for HealthHandler {
    fn content_type(&self) -> ContentType {
        ContentType::of("text/plain", "utf-8")
    }
}

/// A single-worker dynamic resource answering `GET /health`.
pub fn health_resource() -> Result<Resource, ResourceError> {
    Resource::builder("health")
        .handler_pool_size(1)
        .resource_handler(|| HealthHandler)
        .dynamic_route(DynamicHandler::new(Method::GET, "/health", |_, handler| {
            Completes::with_success(handler.entity_response_of(StatusCode::OK, "up"))
        }))
        .build()
}

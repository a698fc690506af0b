//! HTTP routes for resources
//!
//! [`cms_resource`] mounts one resource on two URLs:
//!
//! | Method | URL                 | Endpoint          |
//! |--------|---------------------|-------------------|
//! | GET    | `{prefix}/{name}`      | `collection_get`  |
//! | POST   | `{prefix}/{name}`      | `collection_post` |
//! | GET    | `{prefix}/{name}/{id}` | `get`             |
//! | PUT    | `{prefix}/{name}/{id}` | `put`             |
//! | DELETE | `{prefix}/{name}/{id}` | `delete`          |
//!
//! The id segment must be all digits; anything else is a 404.

use std::sync::{Arc, LazyLock};

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Router,
};
use regex::Regex;
use tower_http::trace::TraceLayer;

use crate::api::{Api, ApiError, ApiOperation, ApiResponse};
use crate::context::RequestContext;
use crate::resource::Resource;

/// Object ids in detail URLs
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("id regex is valid"));

/// Router serving the list and detail URLs of `resource`
///
/// Routers for several resources combine with [`Router::merge`].
pub fn cms_resource<R: Resource>(resource: Arc<R>) -> Router {
    let list_url = resource.api_url();
    let detail_url = format!("{list_url}/{{id}}");

    tracing::debug!(resource = resource.name(), url = %list_url, "mounting resource");

    Router::new()
        .route(
            &list_url,
            get(collection_get::<R>).post(collection_post::<R>),
        )
        .route(
            &detail_url,
            get(get_detail::<R>)
                .put(put_detail::<R>)
                .delete(delete_detail::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(resource)
}

fn parse_id<R: Resource>(resource: &R, raw: &str, operation: ApiOperation) -> Result<i64, ApiError> {
    ID_PATTERN
        .is_match(raw)
        .then(|| raw.parse::<i64>().ok())
        .flatten()
        .ok_or_else(|| ApiError::not_found(resource.name(), raw).with_operation(operation))
}

async fn collection_get<R: Resource>(
    State(resource): State<Arc<R>>,
    request: RequestContext,
) -> Result<ApiResponse, ApiError> {
    Api::new(resource.as_ref(), &request).collection_get().await
}

async fn collection_post<R: Resource>(
    State(resource): State<Arc<R>>,
    request: RequestContext,
    body: Bytes,
) -> Result<ApiResponse, ApiError> {
    Api::new(resource.as_ref(), &request)
        .collection_post(&body)
        .await
}

async fn get_detail<R: Resource>(
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
    request: RequestContext,
) -> Result<ApiResponse, ApiError> {
    let id = parse_id(resource.as_ref(), &id, ApiOperation::Get)?;
    Api::new(resource.as_ref(), &request).get(id).await
}

async fn put_detail<R: Resource>(
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
    request: RequestContext,
    body: Bytes,
) -> Result<ApiResponse, ApiError> {
    let id = parse_id(resource.as_ref(), &id, ApiOperation::Update)?;
    Api::new(resource.as_ref(), &request).put(id, &body).await
}

async fn delete_detail<R: Resource>(
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
    request: RequestContext,
) -> Result<ApiResponse, ApiError> {
    let id = parse_id(resource.as_ref(), &id, ApiOperation::Delete)?;
    Api::new(resource.as_ref(), &request).delete(id).await
}

//! Per-request context handed to authentication and authorization policies
//!
//! [`RequestContext`] is an axum extractor. Upstream middleware (session
//! loading, permission resolution, form validation) communicates with the
//! resource layer by inserting [`Principal`], [`Permissions`] and
//! [`ValidationError`] values into the request extensions:
//!
//! ```rust,ignore
//! async fn load_user(mut request: Request, next: Next) -> Response {
//!     request.extensions_mut().insert(Principal::new(1, "editor"));
//!     request
//!         .extensions_mut()
//!         .insert(Permissions::new(PermissionSet::from_iter(["read-page"])));
//!     next.run(request).await
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ApiError;
use crate::responses::{FieldError, ValidationError};

/// Header carrying a caller-supplied request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

impl Principal {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Answers "does the current user hold this named permission?"
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, permission: &str) -> bool;
}

impl<F> PermissionChecker for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_permission(&self, permission: &str) -> bool {
        self(permission)
    }
}

/// A fixed set of granted permission names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.0.insert(permission.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl PermissionChecker for PermissionSet {
    fn has_permission(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}

/// Request extension holding the caller's permission checker
#[derive(Clone)]
pub struct Permissions(pub Arc<dyn PermissionChecker>);

impl Permissions {
    pub fn new(checker: impl PermissionChecker + 'static) -> Self {
        Self(Arc::new(checker))
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::new(PermissionSet::default())
    }
}

/// Everything a resource endpoint knows about the incoming request
#[derive(Clone)]
pub struct RequestContext {
    request_id: Uuid,
    user: Option<Principal>,
    permissions: Permissions,
    params: HashMap<String, String>,
    validation: ValidationError,
}

impl RequestContext {
    /// Anonymous request with no permissions and no parameters
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            user: None,
            permissions: Permissions::default(),
            params: HashMap::new(),
            validation: ValidationError::new("Validation failed"),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: Principal) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, checker: impl PermissionChecker + 'static) -> Self {
        self.permissions = Permissions::new(checker);
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_validation_error(mut self, error: FieldError) -> Self {
        self.validation.push(error);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn user(&self) -> Option<&Principal> {
        self.user.as_ref()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.0.has_permission(permission)
    }

    /// Query-string parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Field errors collected before the endpoint ran
    pub fn validation_errors(&self) -> &ValidationError {
        &self.validation
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("user", &self.user)
            .field("params", &self.params)
            .field("validation", &self.validation.error_count())
            .finish_non_exhaustive()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {e}")))?;

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .unwrap_or_else(Uuid::now_v7);

        Ok(Self {
            request_id,
            user: parts.extensions.get::<Principal>().cloned(),
            permissions: parts
                .extensions
                .get::<Permissions>()
                .cloned()
                .unwrap_or_default(),
            params,
            validation: parts
                .extensions
                .get::<ValidationError>()
                .cloned()
                .unwrap_or_else(|| ValidationError::new("Validation failed")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_anonymous_context() {
        let context = RequestContext::new();
        assert!(context.user().is_none());
        assert!(!context.has_permission("read-page"));
        assert!(context.param("page").is_none());
        assert!(!context.validation_errors().has_errors());
    }

    #[test]
    fn test_permission_set() {
        let context = RequestContext::new()
            .with_permissions(PermissionSet::from_iter(["read-page", "update-page"]));
        assert!(context.has_permission("read-page"));
        assert!(!context.has_permission("delete-page"));
    }

    #[test]
    fn test_closure_permission_checker() {
        let context =
            RequestContext::new().with_permissions(|name: &str| name.ends_with("-news"));
        assert!(context.has_permission("create-news"));
        assert!(!context.has_permission("create-page"));
    }

    #[tokio::test]
    async fn test_extract_from_request() {
        let request_id = Uuid::now_v7();
        let request = Request::builder()
            .uri("/api/page?page=3&q=news")
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .extension(Principal::new(7, "editor"))
            .extension(Permissions::new(PermissionSet::new().grant("read-page")))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let context = RequestContext::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(context.request_id(), request_id);
        assert_eq!(context.user().unwrap().username, "editor");
        assert!(context.has_permission("read-page"));
        assert_eq!(context.param("page"), Some("3"));
        assert_eq!(context.param("q"), Some("news"));
    }

    #[tokio::test]
    async fn test_extract_without_extensions() {
        let (mut parts, _) = Request::builder()
            .uri("/api/page")
            .body(())
            .unwrap()
            .into_parts();

        let context = RequestContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(context.user().is_none());
        assert!(!context.has_permission("read-page"));
    }
}

//! HTTP response builders with endpoint status codes
//!
//! - **201 Created** - object created by `collection_post`
//! - **204 No Content** - `put` without `always_return_data`, and `delete`
//! - **400 Bad Request** - pending field validation errors
//!
//! ```rust,ignore
//! use cms_api::responses::{Created, NoContent, ValidationError};
//!
//! async fn create_page() -> Created<serde_json::Value> {
//!     Created::new(serde_json::json!({"id": 1})).with_location("/api/page/1")
//! }
//!
//! async fn create_invalid() -> Result<NoContent, ValidationError> {
//!     let mut errors = ValidationError::new("Validation failed");
//!     errors.add_field_error("title", "REQUIRED", "Title is required");
//!     Err(errors)
//! }
//! ```

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// HTTP 201 Created, optionally with a body and a `Location` header
#[derive(Debug)]
pub struct Created<T> {
    data: Option<T>,
    location: Option<String>,
}

impl<T> Created<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            location: None,
        }
    }

    /// 201 without a response body
    pub fn empty() -> Self {
        Self {
            data: None,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = match &self.data {
            Some(data) => (StatusCode::CREATED, Json(data)).into_response(),
            None => StatusCode::CREATED.into_response(),
        };

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

/// HTTP 204 No Content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    /// Machine-readable code, e.g. `"REQUIRED"`
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// HTTP 400 response listing field errors, grouped by field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    error: String,
    code: String,
    status: u16,
    pub errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "VALIDATION_ERROR".to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            errors: BTreeMap::new(),
        }
    }

    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(FieldError::new(field, code, message));
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.entry(error.field.clone()).or_default().push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

impl FromIterator<FieldError> for ValidationError {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = Self::new("Validation failed");
        for error in iter {
            errors.push(error);
        }
        errors
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_response() {
        let response = Created::new(serde_json::json!({"id": 1}))
            .with_location("/api/page/1")
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/page/1"
        );
    }

    #[test]
    fn test_empty_created_response() {
        let response = Created::<()>::empty().into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_no_content_response() {
        let response = NoContent.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_validation_error() {
        let mut error = ValidationError::new("Validation failed");
        error.add_field_error("title", "REQUIRED", "Title is required");
        error.add_field_error("title", "TOO_LONG", "Title is too long");
        error.add_field_error("slug", "INVALID_FORMAT", "Slug may only contain letters");

        assert!(error.has_errors());
        assert_eq!(error.error_count(), 3);
        assert_eq!(error.errors.get("title").unwrap().len(), 2);
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_collect_field_errors() {
        let errors: ValidationError = vec![FieldError::new("name", "REQUIRED", "Name is required")]
            .into_iter()
            .collect();
        assert_eq!(errors.error_count(), 1);
    }
}

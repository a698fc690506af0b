//! Error signals raised by resource endpoints
//!
//! Every failure an endpoint can report is an [`ApiError`]. The error kind
//! decides the HTTP status, so handlers can simply return
//! `Result<ApiResponse, ApiError>` and let axum render the body.
//!
//! # Example
//!
//! ```rust
//! use cms_api::api::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("page", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("42".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationError;

/// Message carried by every authentication failure
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Authentication required";

/// Message carried by every authorization failure
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not authorized";

/// Endpoint operation in progress when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// `collection_get`
    List,
    /// `get`
    Get,
    /// `collection_post`
    Create,
    /// `put`
    Update,
    /// `delete`
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of endpoint failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The caller is not authenticated
    NotAuthenticated,
    /// The caller may not perform this action
    NotAuthorized,
    /// No object exists for the requested identifier
    NotFound,
    /// An object with the submitted identifier already exists
    Conflict,
    /// Malformed body or query parameters
    BadRequest,
    /// The HTTP method is not enabled for this endpoint
    MethodNotAllowed,
    /// Serialization or storage failure
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not_authenticated"),
            Self::NotAuthorized => write!(f, "not_authorized"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::MethodNotAllowed => write!(f, "method_not_allowed"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured endpoint error
///
/// Carries the failing operation, the error category, a human-readable
/// message and, when known, the resource name and object id involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    pub message: String,
    /// Resource name, e.g. `"page"`
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// No object with `entity_id` exists in resource `entity_type`
    ///
    /// # Example
    ///
    /// ```rust
    /// use cms_api::api::ApiError;
    ///
    /// let error = ApiError::not_found("page", "7");
    /// assert_eq!(error.entity_type, Some("page".to_string()));
    /// ```
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Object not found")
            .with_entity(entity_type, entity_id)
    }

    pub fn conflict(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::Create,
            ApiErrorKind::Conflict,
            "Object already exists",
        )
        .with_entity(entity_type, entity_id)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::NotAuthenticated,
            NOT_AUTHENTICATED_MESSAGE,
        )
    }

    pub fn not_authorized() -> Self {
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::NotAuthorized,
            NOT_AUTHORIZED_MESSAGE,
        )
    }

    pub fn method_not_allowed(method: impl fmt::Display) -> Self {
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::MethodNotAllowed,
            format!("Method {method} is not allowed"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Attach the resource name without an object id
    #[must_use]
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        match (&self.entity_type, &self.entity_id) {
            (Some(entity_type), Some(entity_id)) => write!(f, " [{entity_type}: {entity_id}]"),
            (Some(entity_type), None) => write!(f, " [{entity_type}]"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        tracing::debug!(error = %err, "rejected page number");
        Self::bad_request("Invalid page number")
    }
}

/// Response body for endpoint errors
#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                resource = ?self.entity_type,
                id = ?self.entity_id,
                "API error: {}", self.message
            );
        } else {
            tracing::info!(
                operation = %self.operation,
                kind = %self.kind,
                resource = ?self.entity_type,
                id = ?self.entity_id,
                "API request rejected: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

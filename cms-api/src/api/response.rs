//! Successful endpoint outcomes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::responses::{Created, NoContent, ValidationError};

/// What an endpoint produced, before it is rendered as HTTP
#[derive(Debug)]
pub enum ApiResponse {
    /// 200 with a JSON body
    Ok(Value),
    /// 201, with a body only when the resource returns data on write
    Created(Created<Value>),
    /// 204
    NoContent,
    /// 400 listing field errors collected before the endpoint ran
    Invalid(ValidationError),
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ok(_) => StatusCode::OK,
            Self::Created(_) => StatusCode::CREATED,
            Self::NoContent => StatusCode::NO_CONTENT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Ok(body) => Some(body),
            Self::Created(created) => created.data(),
            Self::NoContent | Self::Invalid(_) => None,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Created(created) => created.into_response(),
            Self::NoContent => NoContent.into_response(),
            Self::Invalid(errors) => errors.into_response(),
        }
    }
}

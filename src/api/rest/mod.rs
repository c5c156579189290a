//! REST API module for HTTP endpoints
//!
//! - `/auth/*` - token issue and refresh
//! - `/api/persons/*` - persons, tree view, traversal, relationships
//! - `/api/validations/*` - requests to make a person public
//! - `/api/claims/*` - profile claims

pub mod claims;
pub mod persons;
pub mod tokens;
pub mod validations;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// 200 with the envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
}

/// 201 with the envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::new(data))).into_response()
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Status and machine-readable code for an engine error
pub fn status_and_code(err: &GraphError) -> (StatusCode, &'static str) {
    match err {
        GraphError::PersonNotFound(_) => (StatusCode::NOT_FOUND, "PERSON_NOT_FOUND"),
        GraphError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        GraphError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        GraphError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        GraphError::InvalidRelationship(_) => (StatusCode::BAD_REQUEST, "INVALID_RELATIONSHIP"),
        GraphError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        GraphError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        GraphError::Io(_) | GraphError::Serialization(_) | GraphError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for GraphError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self);
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiError::new(message, code))).into_response()
    }
}

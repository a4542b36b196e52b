//! Error types for the DBBE search API.
//!
//! Every error renders as `{"error": {"code": ..., "message": ...}}` with a
//! matching HTTP status.
//!
//! # Error Mapping
//!
//! | Search Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | NotFound | 404 | not-found |
//! | UnknownEntity | 404 | not-found |
//! | InvalidDocument | 500 | exception |
//! | Backend | 502 | backend |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dbbe_search::SearchError;
use std::fmt;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Record not found (HTTP 404).
    NotFound {
        /// The entity type (e.g., "manuscript").
        entity: String,
        /// The record id.
        id: String,
    },

    /// The path does not name a DBBE entity (HTTP 404).
    UnknownEntity {
        /// The path segment.
        name: String,
    },

    /// Bad request (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The search engine failed (HTTP 502).
    BadGateway {
        /// Name of the failing backend.
        backend: String,
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } | RestError::UnknownEntity { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::NotFound { .. } | RestError::UnknownEntity { .. } => "not-found",
            RestError::BadRequest { .. } => "invalid",
            RestError::BadGateway { .. } => "backend",
            RestError::InternalError { .. } => "exception",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { entity, id } => {
                write!(f, "{} {} not found", entity, id)
            }
            RestError::UnknownEntity { name } => {
                write!(f, "Unknown entity type: {}", name)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::BadGateway { backend, message } => {
                write!(f, "Search backend {} failed: {}", backend, message)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body = error_body(self.code(), &self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Builds the JSON error envelope.
pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

impl From<SearchError> for RestError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NotFound { entity, id } => RestError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            },
            SearchError::UnknownEntity { name } => RestError::UnknownEntity { name },
            SearchError::Backend {
                backend_name,
                message,
            } => RestError::BadGateway {
                backend: backend_name,
                message,
            },
            SearchError::InvalidDocument { message } => RestError::InternalError { message },
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dbbe_search::entity::EntityKind;

    #[test]
    fn test_not_found_from_search_error() {
        let err: RestError = SearchError::not_found(EntityKind::Manuscript, 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "manuscript 7 not found");
    }

    #[test]
    fn test_backend_maps_to_bad_gateway() {
        let err: RestError = SearchError::backend("elasticsearch", "timeout").into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "backend");
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body("invalid", "Accept must be application/json");
        assert_eq!(body["error"]["code"], "invalid");
        assert_eq!(
            body["error"]["message"],
            "Accept must be application/json"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = RestError::BadRequest {
            message: "nope".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

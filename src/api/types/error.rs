//! HTTP error responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    allow: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                message: message.into(),
            },
            allow: None,
        }
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Method not allowed, advertising the permitted methods
    pub fn method_not_allowed(allowed: &[&str]) -> Self {
        let allow = allowed.join(", ");
        let mut err = Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method not allowed, use {}", allow),
        );
        err.allow = Some(allow);
        err
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Gateway timeout
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), message = %self.response.message, "Request failed");
        }

        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(allow) = self.allow.and_then(|a| HeaderValue::from_str(&a).ok()) {
            response.headers_mut().insert(header::ALLOW, allow);
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::NotFound { .. } => Self::not_found(message),
            DomainError::Validation { .. }
            | DomainError::KeyParse { .. }
            | DomainError::IdentityCount { .. } => Self::bad_request(message),
            DomainError::Timeout { .. } => Self::timeout(message),
            DomainError::Storage { .. } | DomainError::Configuration { .. } => {
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::key_parse("x"), StatusCode::BAD_REQUEST),
            (DomainError::identity_count(0), StatusCode::BAD_REQUEST),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                DomainError::timeout("x", std::time::Duration::from_secs(10)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (DomainError::configuration("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[test]
    fn test_identity_count_message() {
        let err = ApiError::from(DomainError::identity_count(2));
        assert_eq!(err.response.message, "expected 1 openpgp entity, got 2");
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::method_not_allowed(&["GET", "POST"]).into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::bad_request("bad body");
        let json = serde_json::to_string(&err.response).unwrap();

        assert_eq!(json, r#"{"message":"bad body"}"#);
    }
}

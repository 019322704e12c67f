//! HTTP rendering of service errors.
//!
//! Every failure leaves the API as a JSON body of the form
//! `{"api": <path>, "result": "Failure", "errorString": <message>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::ReviewError;
use crate::core::types::{FailureResponse, Outcome};

/// A service error tied to the request path that produced it
#[derive(Debug)]
pub struct ApiError {
    pub api: String,
    pub error: ReviewError,
}

impl ApiError {
    pub fn new(api: impl Into<String>, error: ReviewError) -> Self {
        Self {
            api: api.into(),
            error,
        }
    }

    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match &self.error {
            ReviewError::Validation { .. }
            | ReviewError::MalformedPayload(_)
            | ReviewError::InvalidSearchMode(_) => StatusCode::BAD_REQUEST,
            ReviewError::StoreTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ReviewError::StoreConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ReviewError::Persistence(_)
            | ReviewError::Query(_)
            | ReviewError::ConfigError(_)
            | ReviewError::IoError(_)
            | ReviewError::SerdeError(_)
            | ReviewError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message placed in `errorString`
    pub fn error_string(&self) -> String {
        match &self.error {
            ReviewError::InvalidSearchMode(_) => "Invalid search type presented.".to_string(),
            other => other.message(),
        }
    }

    pub fn body(&self) -> FailureResponse {
        FailureResponse {
            api: self.api.clone(),
            result: Outcome::Failure,
            error_string: self.error_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.api, self.error)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
///
/// The failure body is also attached as a response extension for the
/// request logging middleware.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        let mut response = (self.status_code(), Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

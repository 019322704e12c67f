//! Middleware for the soda review API
//!
//! Request logging with duration tracking. Failure bodies produced by
//! [`ApiError`](crate::http::ApiError) travel back as a response
//! extension so the log line carries the `api` path and `errorString`
//! without buffering the body.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::core::types::FailureResponse;

/// Request logging middleware
///
/// Successful requests are logged at INFO. Requests rejected by
/// validation or search-mode checks are logged at WARN, store-side
/// failures at ERROR.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_success() {
        info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        );
        return response;
    }

    let (api, error_string) = match response.extensions().get::<FailureResponse>() {
        Some(failure) => (failure.api.as_str(), failure.error_string.as_str()),
        None => (uri.path(), ""),
    };

    if status.is_client_error() {
        warn!(
            method = %method,
            api = %api,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            error = %error_string,
            "Review request rejected"
        );
    } else {
        error!(
            method = %method,
            api = %api,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            error = %error_string,
            "Review request failed"
        );
    }

    response
}

//! HTTP request handlers for the soda review API
//!
//! Implements handlers for the three endpoints: review submission,
//! review retrieval and the monitoring health check.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    Json,
};
use chrono::Utc;

use crate::core::intake::{self, iso_timestamp};
use crate::core::retrieval;
use crate::core::services::Services;
use crate::core::types::*;
use crate::http::error::ApiError;
use crate::http::extract::ValidatedReview;

/// Name of the machine serving the request
///
/// `HOSTNAME` overrides the operating system's host name.
pub fn host_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| gethostname::gethostname().to_string_lossy().into_owned())
}

/// Health check handler
///
/// Reports the service name, host and current time, echoing the
/// caller's `source` tag. Does not touch the store.
pub async fn health_handler(
    State(services): State<Arc<Services>>,
    Path(source): Path<String>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        timestamp: iso_timestamp(Utc::now()),
        service: services.config.server.service_name.clone(),
        server: host_name(),
        source,
    })
}

/// Submit review handler
///
/// Stores a new review. The payload has already been validated by
/// the [`ValidatedReview`] extractor.
///
/// # Returns
///
/// `{"result": "Success", "details": {...}}` with the insert metadata
///
/// # Errors
///
/// - `Persistence`: the store rejected the insert
/// - `StoreTimeout`: the store did not answer in time
pub async fn submit_review_handler(
    State(services): State<Arc<Services>>,
    OriginalUri(uri): OriginalUri,
    ValidatedReview(payload): ValidatedReview,
) -> Result<Json<SubmitResponse>, ApiError> {
    let details = intake::submit_review(&services, payload)
        .await
        .map_err(|e| ApiError::new(uri.path(), e))?;

    Ok(Json(SubmitResponse {
        result: Outcome::Success,
        details,
    }))
}

/// Retrieve reviews handler
///
/// Runs the search selected by `search_type` for `search_string`.
///
/// # Returns
///
/// A JSON array of reviews (restaurant, user) or drinks (drink); an
/// empty array when nothing matches
///
/// # Errors
///
/// - `InvalidSearchMode`: `search_type` is not restaurant, drink or user
/// - `Query`: the store failed while producing matches
pub async fn retrieve_handler(
    State(services): State<Arc<Services>>,
    OriginalUri(uri): OriginalUri,
    Path((search_type, search_string)): Path<(String, String)>,
) -> Result<Json<SearchMatches>, ApiError> {
    let matches = retrieval::retrieve(&services, &search_type, &search_string)
        .await
        .map_err(|e| ApiError::new(uri.path(), e))?;

    Ok(Json(matches))
}

//! Request extractors that apply the review schema.
//!
//! Handlers only ever see payloads that deserialized into the typed
//! schema and passed field validation. Everything else is rejected
//! here with a structured failure body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::core::error::ReviewError;
use crate::core::types::ReviewPayload;
use crate::http::error::ApiError;

/// A review payload that passed schema validation
#[derive(Debug, Clone)]
pub struct ValidatedReview(pub ReviewPayload);

fn rejection_error(rejection: JsonRejection) -> ReviewError {
    ReviewError::MalformedPayload(rejection.body_text())
}

#[async_trait]
impl<S> FromRequest<S> for ValidatedReview
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let api = req.uri().path().to_string();

        let Json(payload) = Json::<ReviewPayload>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(api.clone(), rejection_error(rejection)))?;

        payload.validate().map_err(|e| ApiError::new(api, e))?;

        Ok(Self(payload))
    }
}

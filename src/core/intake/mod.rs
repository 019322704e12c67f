//! Review intake: validation, normalization and persistence.
//!
//! A submitted payload is validated, turned into the canonical
//! [`Review`] document (verbatim fields plus a server `dateCreated`)
//! and written with a single insert. Nothing reaches the store unless
//! validation succeeds.

mod schema;

pub use schema::{is_iso_date, is_valid_email};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::error::Result;
use crate::core::services::Services;
use crate::core::store::InsertOneOutcome;
use crate::core::types::{Review, ReviewPayload};

/// Format a timestamp the way `dateCreated` is stored
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validate a payload and build its canonical document
///
/// Fields are copied verbatim; drinks keep their submission order.
pub fn normalize(payload: ReviewPayload, now: DateTime<Utc>) -> Result<Review> {
    payload.validate()?;

    let ReviewPayload {
        user_email,
        date_visited,
        overall_rating,
        restaurant,
        drinks,
        dispensor,
    } = payload;

    Ok(Review {
        date_created: iso_timestamp(now),
        user_email,
        date_visited,
        overall_rating,
        restaurant,
        drinks,
        dispensor,
    })
}

/// Validate, normalize and insert a review
///
/// # Errors
///
/// - `Validation`: a field violates the review schema (store untouched)
/// - `Persistence`: the store rejected the insert
/// - `StoreTimeout`: the store did not answer in time
pub async fn submit_review(services: &Services, payload: ReviewPayload) -> Result<InsertOneOutcome> {
    let review = normalize(payload, Utc::now())?;
    let document = serde_json::to_value(&review)?;

    tracing::debug!("Canonical review document: {}", document);

    let outcome = services
        .with_store_timeout("insert_one", services.store.insert_one(document))
        .await
        .map_err(|e| {
            tracing::warn!("Review insert failed: {}", e);
            e
        })?;

    tracing::info!(
        "Stored review {} for restaurant '{}' ({} drinks)",
        outcome.inserted_id,
        review.restaurant.name,
        review.drinks.len()
    );

    Ok(outcome)
}

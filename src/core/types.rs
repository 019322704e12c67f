//! Core data types for the soda review service.
//!
//! This module defines the review data model as submitted by users
//! and as persisted in the document store, plus the response bodies
//! shared by the adapters. Field names follow the stored document
//! shape (camelCase).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::store::InsertOneOutcome;

/// A numeric rating on the 0-10 scale
///
/// Keeps the submitted JSON number untouched so an integer rating is
/// stored and returned as an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(serde_json::Number);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Numeric value, NaN if the number cannot be represented as f64
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    /// Build a rating from a float, `None` for non-finite input
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Rating)
    }
}

impl From<u32> for Rating {
    fn from(value: u32) -> Self {
        Rating(value.into())
    }
}

/// Restaurant section of a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Restaurant {
    pub name: String,

    /// Free-form address, GPS coordinates or place identifier
    pub location: String,

    pub rating: Rating,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// One drink consumed during the visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Drink {
    pub name: String,

    pub rating: Rating,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Dispensing machine section of a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Dispensor {
    /// Machine features such as "Touch Screen" or "Multiple Options"
    pub attributes: Vec<String>,

    /// Rating for the dispensing experience
    pub exp_rating: Rating,

    /// Rating for the machine's cleanliness
    pub clean_rating: Rating,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Inbound review submission, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ReviewPayload {
    pub user_email: String,

    /// ISO-8601 date or timestamp of the visit
    pub date_visited: String,

    pub overall_rating: Rating,

    pub restaurant: Restaurant,

    /// Drinks in the order the user listed them
    pub drinks: Vec<Drink>,

    pub dispensor: Dispensor,
}

/// Canonical review document written to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Server-assigned ISO-8601 creation time
    pub date_created: String,
    pub user_email: String,
    pub date_visited: String,
    pub overall_rating: Rating,
    pub restaurant: Restaurant,
    pub drinks: Vec<Drink>,
    pub dispensor: Dispensor,
}

/// Documents matched by a retrieval
///
/// Serializes as a bare JSON array. Rows are passed through exactly as
/// the store yields them, so documents written by older clients (for
/// instance with a BSON `dateVisited`) are returned rather than
/// rejected. Drink searches yield drink sub-documents, the other modes
/// whole reviews including `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchMatches {
    Reviews(Vec<Value>),
    Drinks(Vec<Value>),
}

impl SearchMatches {
    pub fn len(&self) -> usize {
        match self {
            SearchMatches::Reviews(reviews) => reviews.len(),
            SearchMatches::Drinks(drinks) => drinks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome marker carried in every write/failure body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

/// Response to a successful review submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub result: Outcome,
    pub details: InsertOneOutcome,
}

/// Structured failure body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureResponse {
    /// Request path that failed
    pub api: String,
    pub result: Outcome,
    #[serde(rename = "errorString")]
    pub error_string: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub timestamp: String,
    pub service: String,
    pub server: String,
    /// Echo of the caller-supplied source tag
    pub source: String,
}

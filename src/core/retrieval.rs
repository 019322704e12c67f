//! Review retrieval by restaurant, drink or user.
//!
//! Each search mode maps to a query strategy:
//!
//! - `restaurant`: find reviews whose `restaurant.name` equals the term
//! - `user`: find reviews whose `userEmail` equals the term
//! - `drink`: unwind every review's drinks, keep entries whose name
//!   equals the term and return the drink sub-documents only
//!
//! Matching is exact and case-sensitive. Results keep store order and
//! are collected in full before a response is produced, so a request
//! gets either the whole list or a single failure.

use std::fmt;
use std::str::FromStr;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Result, ReviewError};
use crate::core::services::Services;
use crate::core::store::{DocumentCursor, Filter, Stage};
use crate::core::types::SearchMatches;

/// Which retrieval strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Restaurant,
    Drink,
    User,
}

impl FromStr for SearchMode {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "restaurant" => Ok(SearchMode::Restaurant),
            "drink" => Ok(SearchMode::Drink),
            "user" => Ok(SearchMode::User),
            other => Err(ReviewError::InvalidSearchMode(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Restaurant => "restaurant",
            SearchMode::Drink => "drink",
            SearchMode::User => "user",
        };
        f.write_str(name)
    }
}

/// Store query issued for a search
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Find(Filter),
    Aggregate(Vec<Stage>),
}

impl SearchMode {
    /// Build the store query for a search term
    pub fn query(&self, term: &str) -> Query {
        match self {
            SearchMode::Restaurant => Query::Find(Filter::eq("restaurant.name", term)),
            SearchMode::User => Query::Find(Filter::eq("userEmail", term)),
            // The leading match only narrows the reviews to unwind; the
            // second one picks the individual drink entries.
            SearchMode::Drink => Query::Aggregate(vec![
                Stage::Match(Filter::eq("drinks.name", term)),
                Stage::Unwind("drinks".to_string()),
                Stage::Match(Filter::eq("drinks.name", term)),
                Stage::ReplaceRoot("drinks".to_string()),
            ]),
        }
    }
}

/// Drain a cursor, stopping at the first error
///
/// Documents are not re-validated against the intake schema.
async fn collect_matches(mut cursor: DocumentCursor) -> Result<Vec<Value>> {
    let mut matches = Vec::new();

    while let Some(item) = cursor.next().await {
        let document = item?;
        tracing::trace!("Search match: {}", document);
        matches.push(document);
    }

    Ok(matches)
}

/// Run a search against the store
///
/// # Errors
///
/// - `Query`: the store failed to open or iterate the results
/// - `StoreTimeout`: the store did not finish in time
pub async fn search(services: &Services, mode: SearchMode, term: &str) -> Result<SearchMatches> {
    let store = &services.store;
    let query = mode.query(term);

    let result = services
        .with_store_timeout("search", async {
            match query {
                Query::Find(filter) => {
                    let cursor = store.find(filter).await?;
                    collect_matches(cursor)
                        .await
                        .map(SearchMatches::Reviews)
                }
                Query::Aggregate(pipeline) => {
                    let cursor = store.aggregate(pipeline).await?;
                    collect_matches(cursor)
                        .await
                        .map(SearchMatches::Drinks)
                }
            }
        })
        .await;

    match &result {
        Ok(matches) => tracing::debug!(
            "Search {} '{}' returned {} matches",
            mode,
            term,
            matches.len()
        ),
        Err(e) => tracing::warn!("Search {} '{}' failed: {}", mode, term, e),
    }

    result
}

/// Parse the search mode and run the search
///
/// An unrecognized mode fails before any store interaction.
pub async fn retrieve(services: &Services, mode: &str, term: &str) -> Result<SearchMatches> {
    let mode: SearchMode = mode.parse()?;
    search(services, mode, term).await
}

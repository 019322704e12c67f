//! Document store abstraction.
//!
//! Reviews are persisted as JSON documents in a collection. The
//! service talks to the collection through the [`ReviewStore`]
//! trait, which is held as an explicitly passed `Arc<dyn ReviewStore>`
//! rather than a process global.
//!
//! # Architecture
//!
//! - **ReviewStore**: insert, find and aggregate primitives
//! - **Filter / Stage**: backend-neutral query model
//! - **DocumentCursor**: lazy, finite, non-restartable result stream
//! - **MemoryStore**: in-process backend
//! - **MongoStore**: MongoDB backend (`mongodb` feature, on by default)

mod document;
mod memory;
#[cfg(feature = "mongodb")]
mod mongo;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::{StoreBackend, StoreConfig};
use crate::core::error::{Result, ReviewError};

pub use document::{apply_pipeline, matches_filter, values_at};
pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

/// Stream of documents produced by a query
///
/// The stream ends when the store has no more matches. An `Err` item
/// reports a failure while iterating.
pub type DocumentCursor = BoxStream<'static, Result<Value>>;

/// Store metadata returned for a successful insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneOutcome {
    pub inserted_id: Value,
    pub inserted_count: u64,
}

/// Conjunction of equality conditions on dotted document paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Filter that matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Single `path == value` condition
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(path, value)
    }

    /// Add another `path == value` condition
    pub fn and_eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((path.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }
}

/// One aggregation pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep documents matching the filter
    Match(Filter),
    /// Emit one document per element of the array at the path
    Unwind(String),
    /// Replace each document with the sub-document at the path
    ReplaceRoot(String),
}

/// Document collection used to persist and query reviews
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Insert a single document atomically
    async fn insert_one(&self, document: Value) -> Result<InsertOneOutcome>;

    /// Stream every document matching the filter, in store order
    async fn find(&self, filter: Filter) -> Result<DocumentCursor>;

    /// Run an aggregation pipeline and stream its output
    async fn aggregate(&self, pipeline: Vec<Stage>) -> Result<DocumentCursor>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Release connections held by the store
    async fn shutdown(&self) {}
}

/// Build the configured store and verify it answers
///
/// The connectivity probe is retried `connect_attempts` times with a
/// fixed backoff. Operations issued later on are never retried.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ReviewStore>> {
    let store: Arc<dyn ReviewStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        #[cfg(feature = "mongodb")]
        StoreBackend::Mongodb => Arc::new(MongoStore::connect(config).await?),
        #[cfg(not(feature = "mongodb"))]
        StoreBackend::Mongodb => {
            return Err(ReviewError::StoreConnection(
                "mongodb support not compiled in (enable the `mongodb` feature)".to_string(),
            ))
        }
    };

    probe(store.as_ref(), config.connect_attempts, config.connect_backoff_ms).await?;
    tracing::info!("Connected to {} store", store.name());

    Ok(store)
}

/// Ping the store until it answers or attempts run out
pub async fn probe(store: &dyn ReviewStore, attempts: u32, backoff_ms: u64) -> Result<()> {
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match store.ping().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(
                    "Store ping failed (attempt {}/{}): {}",
                    attempt,
                    attempts,
                    e
                );
                last_error = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    Err(ReviewError::StoreConnection(format!(
        "{} store unreachable after {} attempts: {}",
        store.name(),
        attempts,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

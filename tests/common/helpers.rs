// Test helper functions and instrumented stores

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use soda_review::core::store::{
    DocumentCursor, Filter, InsertOneOutcome, MemoryStore, ReviewStore, Stage,
};
use soda_review::{Config, Result, ReviewError, Services};

/// Build services around a specific store
#[allow(dead_code)] // Used in integration tests
pub fn services_with(store: Arc<dyn ReviewStore>) -> Services {
    Services::new(Config::default(), store)
}

/// Memory store that counts every call it receives
#[allow(dead_code)] // Used in integration tests
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub inserts: AtomicUsize,
    pub queries: AtomicUsize,
}

#[allow(dead_code)] // Used in integration tests
impl CountingStore {
    pub fn calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst) + self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewStore for CountingStore {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn insert_one(&self, document: Value) -> Result<InsertOneOutcome> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_one(document).await
    }

    async fn find(&self, filter: Filter) -> Result<DocumentCursor> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find(filter).await
    }

    async fn aggregate(&self, pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.aggregate(pipeline).await
    }
}

/// Store that rejects every operation
#[allow(dead_code)] // Used in integration tests
pub struct FailingStore;

#[async_trait]
impl ReviewStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn insert_one(&self, _document: Value) -> Result<InsertOneOutcome> {
        Err(ReviewError::Persistence("write concern error".to_string()))
    }

    async fn find(&self, _filter: Filter) -> Result<DocumentCursor> {
        Err(ReviewError::Query("connection reset".to_string()))
    }

    async fn aggregate(&self, _pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        Err(ReviewError::Query("connection reset".to_string()))
    }
}

/// Store whose cursors yield one document and then fail
#[allow(dead_code)] // Used in integration tests
pub struct MidStreamFailureStore;

fn failing_cursor(first: Value) -> DocumentCursor {
    stream::iter(vec![
        Ok(first),
        Err(ReviewError::Query("cursor killed".to_string())),
    ])
    .boxed()
}

#[async_trait]
impl ReviewStore for MidStreamFailureStore {
    fn name(&self) -> &'static str {
        "mid-stream-failure"
    }

    async fn insert_one(&self, _document: Value) -> Result<InsertOneOutcome> {
        Ok(InsertOneOutcome {
            inserted_id: json!("unused"),
            inserted_count: 1,
        })
    }

    async fn find(&self, _filter: Filter) -> Result<DocumentCursor> {
        let mut first = json!({
            "dateCreated": "2023-01-02T00:00:00.000Z",
            "_id": "first"
        });
        let payload = super::fixtures::review_payload_json();
        if let (Some(doc), Some(fields)) = (first.as_object_mut(), payload.as_object()) {
            doc.extend(fields.clone());
        }
        Ok(failing_cursor(first))
    }

    async fn aggregate(&self, _pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        Ok(failing_cursor(json!({"name": "Cola", "rating": 9})))
    }
}

/// Store that never answers
#[allow(dead_code)] // Used in integration tests
pub struct HangingStore;

#[async_trait]
impl ReviewStore for HangingStore {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn insert_one(&self, _document: Value) -> Result<InsertOneOutcome> {
        futures::future::pending().await
    }

    async fn find(&self, _filter: Filter) -> Result<DocumentCursor> {
        futures::future::pending().await
    }

    async fn aggregate(&self, _pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        futures::future::pending().await
    }
}

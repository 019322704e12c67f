//! In-process document store.
//!
//! Keeps documents in insertion order behind an async RwLock. Each
//! insert gets a random hex `_id`. Queries snapshot the matching
//! documents, so a cursor never observes inserts that land after it
//! was opened.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::sync::RwLock;

use super::{apply_pipeline, matches_filter, DocumentCursor, Filter, InsertOneOutcome, ReviewStore, Stage};
use crate::core::error::{Result, ReviewError};

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in the collection
    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }
}

fn cursor(documents: Vec<Value>) -> DocumentCursor {
    stream::iter(documents.into_iter().map(Ok)).boxed()
}

#[async_trait]
impl ReviewStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_one(&self, mut document: Value) -> Result<InsertOneOutcome> {
        let map = document.as_object_mut().ok_or_else(|| {
            ReviewError::Persistence("document must be a JSON object".to_string())
        })?;

        let id = match map.get("_id") {
            Some(existing) => existing.clone(),
            None => {
                let id = Value::String(uuid::Uuid::new_v4().simple().to_string());
                map.insert("_id".to_string(), id.clone());
                id
            }
        };

        let mut documents = self.documents.write().await;
        if documents.iter().any(|doc| doc.get("_id") == Some(&id)) {
            return Err(ReviewError::Persistence(format!(
                "duplicate key error: _id {id}"
            )));
        }
        documents.push(document);

        Ok(InsertOneOutcome {
            inserted_id: id,
            inserted_count: 1,
        })
    }

    async fn find(&self, filter: Filter) -> Result<DocumentCursor> {
        let documents = self.documents.read().await;
        let matches = documents
            .iter()
            .filter(|doc| matches_filter(doc, &filter))
            .cloned()
            .collect();
        Ok(cursor(matches))
    }

    async fn aggregate(&self, pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        let snapshot = self.documents.read().await.clone();
        let output = apply_pipeline(snapshot, &pipeline)?;
        Ok(cursor(output))
    }
}

//! MongoDB-backed document store.
//!
//! Filters and pipeline stages translate one-to-one into `$match`,
//! `$unwind` and `$replaceRoot`. Documents cross the boundary as
//! relaxed extended JSON, so an ObjectId reads back as
//! `{"$oid": "..."}`.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use serde_json::Value;

use super::{DocumentCursor, Filter, InsertOneOutcome, ReviewStore, Stage};
use crate::core::config::StoreConfig;
use crate::core::error::{Result, ReviewError};

/// Review collection in a MongoDB database
pub struct MongoStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Create a client for the configured URI
    ///
    /// The driver connects lazily; reachability is checked by `ping`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| ReviewError::StoreConnection(e.to_string()))?;

        let database = client.database(&config.database);
        let collection = database.collection::<Document>(&config.collection);

        Ok(Self {
            database,
            collection,
        })
    }
}

fn filter_document(filter: &Filter) -> Result<Document> {
    let mut document = Document::new();
    for (path, value) in filter.conditions() {
        let value = Bson::try_from(value.clone())
            .map_err(|e| ReviewError::Query(format!("invalid filter value for '{path}': {e}")))?;
        document.insert(path.clone(), value);
    }
    Ok(document)
}

fn stage_document(stage: &Stage) -> Result<Document> {
    Ok(match stage {
        Stage::Match(filter) => doc! { "$match": filter_document(filter)? },
        Stage::Unwind(path) => doc! { "$unwind": format!("${path}") },
        Stage::ReplaceRoot(path) => doc! { "$replaceRoot": { "newRoot": format!("${path}") } },
    })
}

fn into_json(document: Document) -> Value {
    Bson::Document(document).into_relaxed_extjson()
}

fn cursor(cursor: mongodb::Cursor<Document>) -> DocumentCursor {
    cursor
        .map_ok(into_json)
        .map_err(|e| ReviewError::Query(e.to_string()))
        .boxed()
}

#[async_trait]
impl ReviewStore for MongoStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_one(&self, document: Value) -> Result<InsertOneOutcome> {
        let document = bson::to_document(&document)
            .map_err(|e| ReviewError::Persistence(e.to_string()))?;

        let result = self
            .collection
            .insert_one(document, None)
            .await
            .map_err(|e| ReviewError::Persistence(e.to_string()))?;

        Ok(InsertOneOutcome {
            inserted_id: result.inserted_id.into_relaxed_extjson(),
            inserted_count: 1,
        })
    }

    async fn find(&self, filter: Filter) -> Result<DocumentCursor> {
        let filter = filter_document(&filter)?;
        let found = self
            .collection
            .find(filter, None)
            .await
            .map_err(|e| ReviewError::Query(e.to_string()))?;
        Ok(cursor(found))
    }

    async fn aggregate(&self, pipeline: Vec<Stage>) -> Result<DocumentCursor> {
        let pipeline = pipeline
            .iter()
            .map(stage_document)
            .collect::<Result<Vec<_>>>()?;
        let output = self
            .collection
            .aggregate(pipeline, None)
            .await
            .map_err(|e| ReviewError::Query(e.to_string()))?;
        Ok(cursor(output))
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| ReviewError::StoreConnection(e.to_string()))
    }
}

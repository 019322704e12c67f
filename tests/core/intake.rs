//! Intake integration tests: payload in, canonical document out.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde_json::{json, Value};
use soda_review::core::intake::submit_review;
use soda_review::core::store::{Filter, MemoryStore, ReviewStore};
use soda_review::{Config, Rating, ReviewError, ReviewPayload, Services};

use crate::common::{review_payload, review_payload_json, services_with, CountingStore, FailingStore, HangingStore};

async fn all_documents(store: &MemoryStore) -> Vec<Value> {
    store
        .find(Filter::all())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_stored_document_equals_payload_plus_creation_time() {
    let store = Arc::new(MemoryStore::new());
    let services = services_with(store.clone());

    let before = Utc::now();
    let payload: ReviewPayload = serde_json::from_value(review_payload_json()).unwrap();
    let outcome = submit_review(&services, payload).await.unwrap();

    let docs = all_documents(&store).await;
    assert_eq!(docs.len(), 1);

    let mut stored = docs[0].clone();
    let map = stored.as_object_mut().unwrap();
    assert_eq!(map.remove("_id"), Some(outcome.inserted_id));

    let created = map.remove("dateCreated").unwrap();
    let created: DateTime<Utc> = created.as_str().unwrap().parse().unwrap();
    assert!(created >= before - chrono::Duration::milliseconds(1));
    assert!(created <= Utc::now());

    assert_eq!(stored, review_payload_json());
}

#[tokio::test]
async fn test_drink_order_preserved() {
    let store = Arc::new(MemoryStore::new());
    let services = services_with(store.clone());

    let payload = review_payload(
        "a@b.com",
        "Diner",
        &[("Sprite", 4), ("Cola", 9), ("Dr Pepper", 7), ("Cola", 2)],
    );
    submit_review(&services, payload).await.unwrap();

    let docs = all_documents(&store).await;
    let names: Vec<&str> = docs[0]["drinks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Sprite", "Cola", "Dr Pepper", "Cola"]);
}

#[tokio::test]
async fn test_invalid_payloads_leave_store_untouched() {
    let store = Arc::new(CountingStore::default());
    let services = services_with(store.clone());

    let mut cases: Vec<ReviewPayload> = Vec::new();

    let mut p = review_payload("a@b.com", "Diner", &[("Cola", 9)]);
    p.user_email = "a@b".to_string();
    cases.push(p);

    let mut p = review_payload("a@b.com", "Diner", &[("Cola", 9)]);
    p.date_visited = "last tuesday".to_string();
    cases.push(p);

    let mut p = review_payload("a@b.com", "Diner", &[("Cola", 9)]);
    p.overall_rating = Rating::from_f64(10.5).unwrap();
    cases.push(p);

    let mut p = review_payload("a@b.com", "Diner", &[("Cola", 9)]);
    p.restaurant.name = String::new();
    cases.push(p);

    cases.push(review_payload("a@b.com", "Diner", &[("Cola", 9), ("Sprite", 11)]));

    let mut p = review_payload("a@b.com", "Diner", &[("Cola", 9)]);
    p.dispensor.exp_rating = Rating::from_f64(-0.5).unwrap();
    cases.push(p);

    for payload in cases {
        let result = submit_review(&services, payload).await;
        assert!(
            matches!(result, Err(ReviewError::Validation { .. })),
            "Expected validation error, got {result:?}"
        );
    }

    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(store.inner.count().await, 0);
}

#[tokio::test]
async fn test_boundary_ratings_accepted() {
    let store = Arc::new(MemoryStore::new());
    let services = services_with(store.clone());

    let mut payload = review_payload("a@b.com", "Diner", &[("Cola", 0), ("Sprite", 10)]);
    payload.overall_rating = Rating::from(0);
    payload.restaurant.rating = Rating::from(10);
    payload.dispensor.exp_rating = Rating::from_f64(0.0).unwrap();
    payload.dispensor.clean_rating = Rating::from_f64(10.0).unwrap();

    submit_review(&services, payload).await.unwrap();
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_persistence_error_surfaces_detail() {
    let services = services_with(Arc::new(FailingStore));

    let result = submit_review(&services, review_payload("a@b.com", "Diner", &[("Cola", 9)])).await;

    match result {
        Err(ReviewError::Persistence(detail)) => assert_eq!(detail, "write concern error"),
        other => panic!("Expected persistence error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_hung_insert_times_out() {
    let mut config = Config::default();
    config.store.timeout_ms = 20;
    let services = Services::new(config, Arc::new(HangingStore));

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        submit_review(&services, review_payload("a@b.com", "Diner", &[("Cola", 9)])),
    )
    .await
    .expect("insert should give up on its own");

    assert!(result.unwrap_err().is_timeout());
}

#[tokio::test]
async fn test_comments_round_trip_verbatim() {
    let store = Arc::new(MemoryStore::new());
    let services = services_with(store.clone());

    let mut body = review_payload_json();
    body["restaurant"]["comments"] = json!("");
    body["drinks"][0]["comments"] = json!("Flat, needs more syrup");
    body["dispensor"]["comments"] = json!("Sticky buttons");
    body["overallRating"] = json!(7.5);

    let payload: ReviewPayload = serde_json::from_value(body.clone()).unwrap();
    submit_review(&services, payload).await.unwrap();

    let docs = all_documents(&store).await;
    assert_eq!(docs[0]["restaurant"], body["restaurant"]);
    assert_eq!(docs[0]["drinks"], body["drinks"]);
    assert_eq!(docs[0]["dispensor"], body["dispensor"]);
    assert_eq!(docs[0]["overallRating"], json!(7.5));
}

//! Retrieval integration tests: strategies, ordering and store failures.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use soda_review::core::intake::submit_review;
use soda_review::core::retrieval::{retrieve, search, SearchMode};
use soda_review::core::store::{MemoryStore, ReviewStore};
use soda_review::{Config, ReviewError, SearchMatches, Services};

use crate::common::{
    review_payload, services_with, CountingStore, FailingStore, HangingStore,
    MidStreamFailureStore,
};

async fn seeded_services() -> Services {
    let services = services_with(Arc::new(MemoryStore::new()));
    for (email, restaurant, drinks) in [
        ("a@b.com", "Diner", vec![("Cola", 9), ("Sprite", 4)]),
        ("c@d.com", "Cafe", vec![("Cola", 3)]),
        ("a@b.com", "Grill", vec![("Root Beer", 7)]),
        ("e@f.com", "Diner", vec![("Cola", 6), ("Cola", 1)]),
    ] {
        submit_review(&services, review_payload(email, restaurant, &drinks))
            .await
            .unwrap();
    }
    services
}

#[tokio::test]
async fn test_drink_search_returns_drink_shaped_rows() {
    let services = seeded_services().await;

    let matches = search(&services, SearchMode::Drink, "Cola").await.unwrap();
    let value = serde_json::to_value(&matches).unwrap();

    let rows = value.as_array().unwrap();
    // One row per matching drink entry, across three reviews
    assert_eq!(rows.len(), 4);
    for row in rows {
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| ["name", "rating", "comments"].contains(&k.as_str())));
        assert_eq!(row["name"], "Cola");
    }
    let ratings: Vec<u64> = rows.iter().map(|r| r["rating"].as_u64().unwrap()).collect();
    assert_eq!(ratings, vec![9, 3, 6, 1]);
}

#[tokio::test]
async fn test_restaurant_search_returns_full_reviews() {
    let services = seeded_services().await;

    match search(&services, SearchMode::Restaurant, "Diner").await.unwrap() {
        SearchMatches::Reviews(reviews) => {
            let emails: Vec<&str> = reviews
                .iter()
                .map(|r| r["userEmail"].as_str().unwrap())
                .collect();
            assert_eq!(emails, vec!["a@b.com", "e@f.com"]);
            assert!(reviews.iter().all(|r| r["dateCreated"].is_string()));
            assert!(reviews.iter().all(|r| r["_id"].is_string()));
        }
        other => panic!("Expected reviews, got {other:?}"),
    }
}

#[tokio::test]
async fn test_documents_from_older_writers_are_returned() {
    let store = Arc::new(MemoryStore::new());
    let services = services_with(store.clone());
    submit_review(&services, review_payload("a@b.com", "Diner", &[("Cola", 9)]))
        .await
        .unwrap();

    // Stored with a BSON date and no dateCreated, as earlier clients did
    store
        .insert_one(json!({
            "userEmail": "old@b.com",
            "dateVisited": {"$date": "2022-06-01T00:00:00.000Z"},
            "overallRating": 7.5,
            "restaurant": {"name": "Diner", "location": "123 Main", "rating": 6},
            "drinks": [{"name": "Cola", "rating": 8, "cup": "paper"}],
            "dispensor": {"attributes": ["Ice"], "expRating": 5, "cleanRating": 4}
        }))
        .await
        .unwrap();

    let matches = search(&services, SearchMode::Restaurant, "Diner").await.unwrap();
    let rows = serde_json::to_value(&matches).unwrap();
    let emails: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["userEmail"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["a@b.com", "old@b.com"]);

    let matches = search(&services, SearchMode::Drink, "Cola").await.unwrap();
    assert_eq!(
        serde_json::to_value(&matches).unwrap(),
        json!([
            {"name": "Cola", "rating": 9, "comments": ""},
            {"name": "Cola", "rating": 8, "cup": "paper"}
        ])
    );
}

#[tokio::test]
async fn test_user_search_exact_match() {
    let services = seeded_services().await;

    let matches = search(&services, SearchMode::User, "a@b.com").await.unwrap();
    assert_eq!(matches.len(), 2);

    let matches = search(&services, SearchMode::User, "A@B.com").await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_unmatched_restaurant_is_empty_array() {
    let services = seeded_services().await;

    let matches = search(&services, SearchMode::Restaurant, "Nowhere").await.unwrap();
    assert_eq!(serde_json::to_value(&matches).unwrap(), json!([]));
}

#[tokio::test]
async fn test_invalid_mode_never_touches_store() {
    let store = Arc::new(CountingStore::default());
    let services = services_with(store.clone());

    let result = retrieve(&services, "beverage", "Cola").await;

    assert!(matches!(result, Err(ReviewError::InvalidSearchMode(ref m)) if m == "beverage"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_query_error_when_opening_cursor() {
    let services = services_with(Arc::new(FailingStore));

    for mode in [SearchMode::Restaurant, SearchMode::Drink, SearchMode::User] {
        let result = search(&services, mode, "x").await;
        assert!(matches!(result, Err(ReviewError::Query(_))), "mode {mode}");
    }
}

#[tokio::test]
async fn test_mid_stream_error_yields_single_failure() {
    let services = services_with(Arc::new(MidStreamFailureStore));

    // The first document arrives before the failure; the caller only
    // ever sees the failure, never a partial list.
    let result = search(&services, SearchMode::Restaurant, "Diner").await;
    match result {
        Err(ReviewError::Query(detail)) => assert_eq!(detail, "cursor killed"),
        other => panic!("Expected query error, got {other:?}"),
    }

    let result = search(&services, SearchMode::Drink, "Cola").await;
    assert!(matches!(result, Err(ReviewError::Query(_))));
}

#[tokio::test]
async fn test_hung_query_times_out() {
    let mut config = Config::default();
    config.store.timeout_ms = 20;
    let services = Services::new(config, Arc::new(HangingStore));

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        search(&services, SearchMode::User, "a@b.com"),
    )
    .await
    .expect("search should give up on its own");

    assert!(result.unwrap_err().is_timeout());
}

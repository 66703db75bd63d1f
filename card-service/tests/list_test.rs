//! Listing, paging and sorting.

mod common;

use common::{TestApp, KUMAR, OWEN};

async fn list(app: &TestApp, query: &str, who: (&str, &str)) -> Vec<serde_json::Value> {
    let response = app
        .get(&format!("/cards{}", query), who)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    response.json().await.expect("Failed to parse response")
}

fn ids(cards: &[serde_json::Value]) -> Vec<i64> {
    cards.iter().map(|c| c["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn first_page_of_one_by_amount_desc() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?page=0&size=1&sort=amount,desc", OWEN).await;

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["amount"].as_f64(), Some(150.0));
}

#[tokio::test]
async fn default_listing_is_amount_desc() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "", OWEN).await;
    assert_eq!(ids(&cards), vec![101, 99, 100]);
}

#[tokio::test]
async fn listing_only_contains_own_cards() {
    let app = TestApp::spawn().await;

    for query in ["", "?sort=owner,asc", "?sort=id,desc&size=100", "?page=0&size=2"] {
        let cards = list(&app, query, OWEN).await;
        assert!(
            cards.iter().all(|c| c["owner"] == "Owen"),
            "query {query} leaked another owner's card"
        );
    }

    let kumar = list(&app, "", KUMAR).await;
    assert_eq!(ids(&kumar), vec![102]);
}

#[tokio::test]
async fn sort_by_id_without_direction_is_ascending() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?sort=id", OWEN).await;
    assert_eq!(ids(&cards), vec![99, 100, 101]);
}

#[tokio::test]
async fn pages_walk_the_sorted_set() {
    let app = TestApp::spawn().await;

    let first = list(&app, "?page=0&size=2&sort=amount,asc", OWEN).await;
    let second = list(&app, "?page=1&size=2&sort=amount,asc", OWEN).await;
    let third = list(&app, "?page=2&size=2&sort=amount,asc", OWEN).await;

    assert_eq!(ids(&first), vec![100, 99]);
    assert_eq!(ids(&second), vec![101]);
    assert!(third.is_empty());
}

#[tokio::test]
async fn bad_parameters_fall_back_to_defaults() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?page=abc&size=xyz&sort=amount,sideways", OWEN).await;
    assert_eq!(ids(&cards), vec![101, 99, 100]);
}

#[tokio::test]
async fn zero_size_is_empty() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?size=0", OWEN).await;
    assert!(cards.is_empty());
}

#[tokio::test]
async fn repeated_sort_keys_use_default_order() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?sort=amount,desc&sort=id,asc", OWEN).await;
    assert_eq!(ids(&cards), vec![101, 99, 100]);

    let cards = list(&app, "?sort=id,asc&sort=id,asc", OWEN).await;
    assert_eq!(ids(&cards), vec![101, 99, 100]);
}

#[tokio::test]
async fn repeated_page_and_size_keep_first_value() {
    let app = TestApp::spawn().await;

    let cards = list(&app, "?page=0&page=1&size=1&size=50&sort=id", OWEN).await;
    assert_eq!(ids(&cards), vec![99]);
}

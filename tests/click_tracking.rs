mod common;

use axum::http::StatusCode;
use futures_util::future::join_all;
use serde_json::{Value, json};
use shortify::domain::click_worker::run_click_worker;
use shortify::domain::repositories::LinkRepository;
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_redirect_and_count() {
    let common::TestApp {
        server,
        repository,
        clicks,
    } = common::spawn_app();
    let store: Arc<dyn LinkRepository> = repository.clone();
    tokio::spawn(run_click_worker(clicks, store, 4));

    let body: Value = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/landing" }))
        .await
        .json();
    let code = common::code_of(body["shortUrl"].as_str().unwrap());

    let response = server.get(&format!("/{code}")).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/landing");

    common::wait_for_clicks(&repository, &code, 1).await;

    let urls: Value = server.get("/api/urls").await.json();
    assert_eq!(urls["urls"][0]["short_code"], code.as_str());
    assert_eq!(urls["urls"][0]["click_count"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redirects_are_all_counted() {
    let common::TestApp {
        server,
        repository,
        clicks,
    } = common::spawn_app();
    let store: Arc<dyn LinkRepository> = repository.clone();
    tokio::spawn(run_click_worker(clicks, store, 4));

    repository.seed("https://example.com/popular", "hot123", None, chrono::Utc::now());

    let responses = join_all((0..50).map(|_| server.get("/hot123").into_future())).await;
    for response in responses {
        response.assert_status(StatusCode::FOUND);
    }

    common::wait_for_clicks(&repository, "hot123", 50).await;
}

#[tokio::test]
async fn test_expired_link_is_not_counted() {
    let common::TestApp {
        server,
        repository,
        clicks,
    } = common::spawn_app();
    let store: Arc<dyn LinkRepository> = repository.clone();
    tokio::spawn(run_click_worker(clicks, store, 4));

    repository.seed(
        "https://example.com/past",
        "past12",
        Some(chrono::Utc::now() - chrono::Duration::seconds(1)),
        chrono::Utc::now() - chrono::Duration::hours(1),
    );
    repository.seed("https://example.com/live", "live12", None, chrono::Utc::now());

    server.get("/past12").await.assert_status(StatusCode::GONE);
    server.get("/live12").await.assert_status(StatusCode::FOUND);

    common::wait_for_clicks(&repository, "live12", 1).await;
    assert_eq!(repository.click_count("past12"), Some(0));
}

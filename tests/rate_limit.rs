mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

fn payload(n: usize) -> Value {
    json!({ "url": format!("https://example.com/page/{n}") })
}

#[tokio::test]
async fn test_sixth_request_in_window_is_rejected() {
    let app = common::spawn_app();

    for n in 0..5 {
        app.server
            .post("/shorten")
            .json(&payload(n))
            .await
            .assert_status_ok();
    }

    let response = app.server.post("/shorten").json(&payload(5)).await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.header("retry-after"), "60");
    let body: Value = response.json();
    assert_eq!(body["error"], "Too many requests, please slow down.");
    assert_eq!(app.repository.len(), 5);
}

#[tokio::test]
async fn test_invalid_requests_count_against_quota() {
    let app = common::spawn_app();

    for _ in 0..5 {
        app.server
            .post("/shorten")
            .json(&json!({ "url": "nope" }))
            .await
            .assert_status_bad_request();
    }

    app.server
        .post("/shorten")
        .json(&payload(0))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_clients_are_limited_independently() {
    let app = common::spawn_app_with(common::TestOptions {
        behind_proxy: true,
        ..Default::default()
    });

    for n in 0..5 {
        app.server
            .post("/shorten")
            .add_header("x-forwarded-for", "203.0.113.1")
            .json(&payload(n))
            .await
            .assert_status_ok();
    }

    app.server
        .post("/shorten")
        .add_header("x-forwarded-for", "203.0.113.1")
        .json(&payload(5))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    app.server
        .post("/shorten")
        .add_header("x-forwarded-for", "203.0.113.2, 10.0.0.1")
        .json(&payload(6))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_proxy_headers_ignored_unless_behind_proxy() {
    let app = common::spawn_app();

    for n in 0..5 {
        app.server
            .post("/shorten")
            .add_header("x-forwarded-for", format!("198.51.100.{n}"))
            .json(&payload(n))
            .await
            .assert_status_ok();
    }

    // Every request came from the same peer address.
    app.server
        .post("/shorten")
        .add_header("x-forwarded-for", "198.51.100.99")
        .json(&payload(5))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_other_routes_are_not_limited() {
    let app = common::spawn_app_with(common::TestOptions {
        rate_limit_max: 1,
        ..Default::default()
    });

    app.server
        .post("/shorten")
        .json(&payload(0))
        .await
        .assert_status_ok();

    for _ in 0..10 {
        app.server.get("/api/urls").await.assert_status_ok();
        app.server.get("/health").await.assert_status_ok();
    }

    app.server
        .post("/shorten")
        .json(&payload(1))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

//! HTTP-level tests for `POST /api/verify-staff`.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, post_json, STAFF_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn correct_password_is_accepted() {
    let app = common::build_test_app(common::test_store());
    let response = post_json(app, "/api/verify-staff", json!({ "password": STAFF_PASSWORD })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true }));
}

#[tokio::test]
async fn wrong_password_is_401() {
    let app = common::build_test_app(common::test_store());
    let response = post_json(app, "/api/verify-staff", json!({ "password": "guess" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": "Incorrect password" })
    );
}

#[tokio::test]
async fn missing_or_invalid_password_is_400() {
    for body in [json!({}), json!({ "password": "" }), json!({ "password": 1234 })] {
        let app = common::build_test_app(common::test_store());
        let response = post_json(app, "/api/verify-staff", body.clone()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            body_json(response).await,
            json!({ "ok": false, "message": "Password required" })
        );
    }
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = common::build_test_app(common::test_store());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/verify-staff")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["ok"], false);
}

#[tokio::test]
async fn store_failure_is_500() {
    let store = common::test_store();
    store.fail_with("timeout");
    let app = common::build_test_app(store);

    let response = post_json(app, "/api/verify-staff", json!({ "password": STAFF_PASSWORD })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": "Server error" })
    );
}

#[tokio::test]
async fn missing_password_row_is_500() {
    let store = std::sync::Arc::new(badgelink_core::memory_store::MemoryBadgeStore::new());
    let app = common::build_test_app(store);

    let response = post_json(app, "/api/verify-staff", json!({ "password": "anything" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

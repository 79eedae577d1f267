#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use badgelink_api::config::ServerConfig;
use badgelink_api::router::build_app_router;
use badgelink_api::sessions::SessionRegistry;
use badgelink_api::state::AppState;
use badgelink_core::config::ScanTimings;
use badgelink_core::linking::{BadgeStore, Linker};
use badgelink_core::memory_store::MemoryBadgeStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Staff password seeded into every test store.
pub const STAFF_PASSWORD: &str = "front-desk-2026";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        session_idle_timeout_secs: 1800,
        scan_timings: ScanTimings::default(),
    }
}

/// A fresh in-memory store with the staff password seeded.
pub fn test_store() -> Arc<MemoryBadgeStore> {
    Arc::new(MemoryBadgeStore::new().with_staff_password(STAFF_PASSWORD))
}

/// Build the full application router over `store`, using the same
/// middleware stack as production.
pub fn build_test_app(store: Arc<MemoryBadgeStore>) -> Router {
    let config = test_config();
    let state = AppState {
        linker: Linker::new(store as Arc<dyn BadgeStore>),
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

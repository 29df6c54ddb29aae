#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use releasetracker_api::config::ServerConfig;
use releasetracker_api::router::build_app_router;
use releasetracker_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// POST a raw (possibly invalid) JSON string.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

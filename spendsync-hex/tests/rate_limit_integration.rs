//! Integration tests for rate limiting middleware.
//!
//! These tests verify the HTTP-level behavior of rate limiting,
//! including 429 responses and proper integration with the middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode, header::RETRY_AFTER},
};
use http_body_util::BodyExt;
use spendsync_auth::{BcryptHasher, TokenIssuer};
use spendsync_hex::{AuthService, inbound::HttpServer};
use spendsync_repo::MemoryStore;
use tower::ServiceExt;

/// Helper to create a test server with a very low rate limit.
fn create_test_server(max_requests: u32) -> HttpServer<MemoryStore> {
    let tokens = TokenIssuer::new("rate-limit-test-secret", Duration::from_secs(3600)).unwrap();
    let service = AuthService::new(
        MemoryStore::new(),
        BcryptHasher::new(4).unwrap(),
        Arc::new(tokens),
    );
    HttpServer::with_rate_limit(service, max_requests, Duration::from_secs(60))
}

/// Helper to make a health check request.
fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

/// Helper to make a login attempt from the given peer address.
fn login_request(peer: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(
            r#"{"email": "nobody@example.com", "password": "Secret123!"}"#,
        ))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
    request
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    // Only 3 requests allowed per minute
    let server = create_test_server(3);
    let app = server.router();

    for i in 1..=3 {
        let response = app
            .clone()
            .oneshot(login_request("192.0.2.10:40000"))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "Request {} should reach the handler (quota not yet exceeded)",
            i
        );
    }

    // 4th request should be rate limited
    let response = app
        .clone()
        .oneshot(login_request("192.0.2.10:40000"))
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );

    let retry_after: u64 = response.headers()[RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "Too many requests");
    assert_eq!(json["retry_after_seconds"], retry_after);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let server = create_test_server(1);
    let app = server.router();

    // Health endpoint bypasses rate limiting entirely
    for _ in 0..10 {
        let response = app.clone().oneshot(health_request()).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_client_isolation() {
    let server = create_test_server(1);
    let app = server.router();

    // Client A uses its whole quota
    let response = app
        .clone()
        .oneshot(login_request("192.0.2.10:40000"))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let response = app
        .clone()
        .oneshot(login_request("192.0.2.10:40001"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Same IP on another port shares the bucket"
    );

    // Client B still has its own quota
    let response = app
        .clone()
        .oneshot(login_request("198.51.100.7:40000"))
        .await
        .unwrap();
    assert_ne!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Client B should have its own quota"
    );
}

#[tokio::test]
async fn test_rate_limiting_protects_authenticated_routes() {
    let server = create_test_server(2);
    let app = server.router();

    for expected in [StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED, StatusCode::TOO_MANY_REQUESTS] {
        let mut request = Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("192.0.2.20:40000".parse::<SocketAddr>().unwrap()));

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_rate_limiting_response_format() {
    let server = create_test_server(1);
    let app = server.router();

    let _ = app.clone().oneshot(login_request("192.0.2.30:40000")).await;
    let response = app
        .clone()
        .oneshot(login_request("192.0.2.30:40000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(
        json.get("error").is_some(),
        "Response should have 'error' field"
    );
    assert!(
        json.get("retry_after_seconds").is_some(),
        "Response should have 'retry_after_seconds' field"
    );
}

//! Rate limiting middleware.
//!
//! Admits or rejects each request against a [`RateLimiter`] keyed by the
//! client's network identity.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use spendsync_auth::{Admission, RateLimiter};
use spendsync_types::AuthError;

use super::handlers::ApiError;

/// Key shared by all requests whose peer address is not known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Limiter plus the policy for deriving the client key.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiter>,
    /// Take the client address from the first `X-Forwarded-For` entry.
    pub trust_proxy: bool,
}

/// Derives the limiter key for a request.
fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Rate limiting middleware. `/health` is never counted.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request, state.trust_proxy);
    match state.limiter.check(&key) {
        Admission::Admit { .. } => next.run(request).await,
        Admission::Reject { retry_after } => {
            let retry_after_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            tracing::warn!(client = %key, retry_after_secs, "rate limit exceeded");
            ApiError(AuthError::RateLimited { retry_after_secs }.into()).into_response()
        }
    }
}

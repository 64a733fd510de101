//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

pub mod auth;
mod handlers;
pub mod rate_limit;
mod server;

pub use auth::{AuthUser, require_auth};
pub use handlers::{ApiError, AppState, X_AUTH_TOKEN};
pub use rate_limit::{RateLimitState, rate_limit_middleware};
pub use server::{DEFAULT_CLIENT_ORIGIN, HttpServer};

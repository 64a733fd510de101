//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use spendsync_auth::{FixedWindowLimiter, RateLimiter};
use spendsync_types::CredentialStore;

use super::auth::require_auth;
use super::handlers::{self, AppState, X_AUTH_TOKEN};
use super::rate_limit::{RateLimitState, rate_limit_middleware};
use crate::AuthService;

/// Origin allowed by CORS unless overridden.
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";

/// How often idle rate buckets are swept.
const BUCKET_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP Server for the SpendSync auth API.
pub struct HttpServer<S: CredentialStore> {
    state: Arc<AppState<S>>,
    limiter: Arc<dyn RateLimiter>,
    trust_proxy: bool,
    cors_origin: HeaderValue,
}

impl<S: CredentialStore> HttpServer<S> {
    /// Creates a new HTTP server with the default limiter (60 requests per minute).
    pub fn new(service: AuthService<S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            limiter: Arc::new(FixedWindowLimiter::default()),
            trust_proxy: false,
            cors_origin: HeaderValue::from_static(DEFAULT_CLIENT_ORIGIN),
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: AuthService<S>, max_requests: u32, window: Duration) -> Self {
        Self::new(service).with_rate_limiter(Arc::new(FixedWindowLimiter::new(max_requests, window)))
    }

    /// Replaces the rate limiter, e.g. with a shared-cache implementation.
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Keys the limiter on the first `X-Forwarded-For` entry when set.
    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Sets the browser origin allowed by CORS.
    pub fn with_cors_origin(mut self, origin: &str) -> anyhow::Result<Self> {
        self.cors_origin = HeaderValue::from_str(origin)
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))?;
        Ok(self)
    }

    fn cors(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.cors_origin.clone())
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers([X_AUTH_TOKEN])
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let rate_limit = RateLimitState {
            limiter: self.limiter.clone(),
            trust_proxy: self.trust_proxy,
        };

        let protected = Router::new()
            .route("/api/auth/logout", post(handlers::logout))
            .route("/api/auth/me", get(handlers::me::<S>))
            .route("/api/auth/profile", put(handlers::update_profile::<S>))
            .route_layer(middleware::from_fn_with_state(
                self.state.service.tokens().clone(),
                require_auth,
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route("/api/auth/register", post(handlers::register::<S>))
            .route("/api/auth/login", post(handlers::login::<S>))
            .merge(protected)
            .fallback(handlers::not_found)
            .layer(middleware::from_fn_with_state(
                rate_limit,
                rate_limit_middleware,
            ))
            .layer(self.cors())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let limiter = self.limiter.clone();
        let sweeper = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(BUCKET_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                limiter.purge_expired();
            }
        });

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}

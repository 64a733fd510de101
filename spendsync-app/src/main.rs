//! # SpendSync Auth Gateway
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the credential store adapter
//! - Create the token issuer, password hasher and account service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spendsync_auth::{BcryptHasher, TokenIssuer};
use spendsync_hex::{AuthService, inbound::HttpServer};
use spendsync_repo::build_repo;

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("spendsync-auth"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration; a missing JWT_SECRET stops here
    let config = config::Config::from_env()?;

    // OpenTelemetry export only when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spendsync_app=debug,spendsync_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting SpendSync auth server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::debug!(?config, "loaded configuration");

    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl)?;
    let hasher = BcryptHasher::new(config.bcrypt_cost)?;

    // Build credential store (handles connection retry and migration)
    let repo = build_repo(&config.database_url).await?;

    // Create the account service
    let service = AuthService::new(repo, hasher, Arc::new(tokens));

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(
        service,
        config.rate_limit_max,
        config.rate_limit_window,
    )
    .with_trust_proxy(config.trust_proxy)
    .with_cors_origin(&config.client_url)?;
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}

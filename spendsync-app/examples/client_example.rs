//! Client example demonstrating the full account flow against a running server.
//!
//! Run with: cargo run -p spendsync-app --example client_example

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use spendsync_auth::{BcryptHasher, TokenIssuer};
use spendsync_client::SpendSyncClient;
use spendsync_hex::{AuthService, inbound::HttpServer};
use spendsync_repo::build_repo;
use spendsync_types::{RegisterRequest, UpdateProfileRequest};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Bind an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr}...");

    // Process-local store, nothing touches disk
    let repo = build_repo("memory://").await?;
    let tokens = TokenIssuer::new("example-secret-do-not-reuse", Duration::from_secs(3600))?;
    let service = AuthService::new(repo, BcryptHasher::new(4)?, Arc::new(tokens));
    let router = HttpServer::new(service).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            eprintln!("server error: {e}");
        }
    });

    let client = SpendSyncClient::new(format!("http://{addr}"));

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: register, log in, read and update the profile
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let response = client.clone().with_token("not-a-token").me().await;
    assert!(response.is_err());
    println!("✅ Rejected bogus token: {}", response.unwrap_err());

    let registered = client
        .register(&RegisterRequest {
            username: "alice".into(),
            full_name: "Alice Liddell".into(),
            email: "alice@example.com".into(),
            password: "Secret123!".into(),
            country: "GB".into(),
            currency: Some("GBP".into()),
            profile_photo: None,
        })
        .await?;
    println!(
        "✅ Registered {} (id={})",
        registered.user.username, registered.user.id
    );

    let login = client.login("alice", "Secret123!").await?;
    println!("✅ Logged in, token expires at {}", login.expires_at);

    let client = client.with_token(login.token);

    let me = client.me().await?;
    println!("✅ Current user: {} <{}>", me.full_name, me.email);

    let updated = client
        .update_profile(&UpdateProfileRequest {
            bio: Some("Splits every bill to the penny".into()),
            ..Default::default()
        })
        .await?;
    println!("✅ Updated bio: {}", updated.bio.unwrap_or_default());

    client.logout().await?;
    println!("✅ Logged out");

    println!("\n🎉 Example completed successfully!");

    Ok(())
}

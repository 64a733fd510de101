//! SpendSync CLI
//!
//! Command-line interface for the SpendSync auth API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use spendsync_client::SpendSyncClient;
use spendsync_types::{RegisterRequest, UpdateProfileRequest};

#[derive(Parser)]
#[command(name = "spendsync")]
#[command(author, version, about = "SpendSync auth API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the SpendSync API
    #[arg(
        long,
        env = "SPENDSYNC_API_URL",
        default_value = "http://localhost:4000"
    )]
    api_url: String,

    /// Bearer token for authenticated commands
    #[arg(long, env = "SPENDSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account and print its token
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SPENDSYNC_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        country: String,
        /// ISO currency code (defaults to USD on the server)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Log in with email or username and print the token
    Login {
        /// Email address or username
        login: String,
        #[arg(long, env = "SPENDSYNC_PASSWORD", hide_env_values = true)]
        password: String,
        /// Print only the token, e.g. for `export SPENDSYNC_TOKEN=$(...)`
        #[arg(long)]
        token_only: bool,
    },
    /// Show the current user's profile
    Me,
    /// Update the current user's profile
    Profile {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        profile_photo: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// End the session (the token stays valid until it expires)
    Logout,
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = SpendSyncClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Register {
            username,
            full_name,
            email,
            password,
            country,
            currency,
        } => {
            let req = RegisterRequest {
                username,
                full_name,
                email,
                password,
                country,
                currency,
                profile_photo: None,
            };
            let resp = client.register(&req).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }

        Commands::Login {
            login,
            password,
            token_only,
        } => {
            let resp = client.login(&login, &password).await?;
            if token_only {
                println!("{}", resp.token);
            } else {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            }
        }

        Commands::Me => {
            let profile = client.me().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        Commands::Profile {
            full_name,
            country,
            currency,
            profile_photo,
            bio,
        } => {
            let update = UpdateProfileRequest {
                full_name,
                country,
                currency,
                profile_photo,
                bio,
            };
            let profile = client.update_profile(&update).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        Commands::Logout => {
            client.logout().await?;
            println!("✓ Logged out; discard the token");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_login_parses_identifier_and_flags() {
        let cli = Cli::try_parse_from([
            "spendsync",
            "--api-url",
            "http://example.test",
            "login",
            "alice",
            "--password",
            "Secret123!",
            "--token-only",
        ])
        .unwrap();

        assert_eq!(cli.api_url, "http://example.test");
        match cli.command {
            Commands::Login {
                login, token_only, ..
            } => {
                assert_eq!(login, "alice");
                assert!(token_only);
            }
            _ => panic!("expected login command"),
        }
    }
}

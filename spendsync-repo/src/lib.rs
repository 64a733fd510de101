//! # SpendSync Repository
//!
//! Concrete credential store implementations (adapters) for the auth gateway.
//! This crate provides the adapters that implement the `CredentialStore` port.

use async_trait::async_trait;
use spendsync_types::{CredentialStore, RepoError, UpdateProfileRequest, User, UserId};

pub mod memory;
pub mod retry;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_tests;

pub use memory::MemoryStore;
pub use retry::{RetryPolicy, connect_with_retry};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// Unified credential store chosen at startup from the database URL.
pub enum Repo {
    Memory(MemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteRepo),
}

/// Build and initialize a credential store from a database URL.
///
/// - `memory://` - process-local store, lost on restart
/// - `sqlite:...` - SQLite file or `sqlite::memory:` (requires the `sqlite` feature)
///
/// Database connections are retried with exponential backoff
/// (see [`RetryPolicy::default`]) before giving up.
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("memory://").await?;
/// let repo = build_repo("sqlite://spendsync.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    if database_url.starts_with("memory:") {
        tracing::warn!("using in-memory credential store; accounts are lost on restart");
        return Ok(Repo::Memory(MemoryStore::new()));
    }
    if database_url.starts_with("sqlite:") {
        return connect_sqlite(database_url).await;
    }
    anyhow::bail!("Unsupported DATABASE_URL scheme: {}", database_url)
}

#[cfg(feature = "sqlite")]
async fn connect_sqlite(database_url: &str) -> anyhow::Result<Repo> {
    let inner = connect_with_retry(RetryPolicy::default(), || SqliteRepo::new(database_url)).await?;
    Ok(Repo::Sqlite(inner))
}

#[cfg(not(feature = "sqlite"))]
async fn connect_sqlite(_database_url: &str) -> anyhow::Result<Repo> {
    anyhow::bail!("SQLite support not compiled in; enable the `sqlite` feature")
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement CredentialStore for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CredentialStore for Repo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        match self {
            Repo::Memory(inner) => inner.create_user(user).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(inner) => inner.create_user(user).await,
        }
    }

    async fn find_by_login_identifier(&self, identifier: &str) -> Result<Option<User>, RepoError> {
        match self {
            Repo::Memory(inner) => inner.find_by_login_identifier(identifier).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(inner) => inner.find_by_login_identifier(identifier).await,
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        match self {
            Repo::Memory(inner) => inner.find_by_id(id).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(inner) => inner.find_by_id(id).await,
        }
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>, RepoError> {
        match self {
            Repo::Memory(inner) => inner.update_profile(id, update).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(inner) => inner.update_profile(id, update).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_repo_memory_scheme() {
        let repo = build_repo("memory://").await.unwrap();
        assert!(matches!(repo, Repo::Memory(_)));
    }

    #[tokio::test]
    async fn test_build_repo_rejects_unknown_scheme() {
        let err = build_repo("mongodb://127.0.0.1:27017/spendsync")
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported DATABASE_URL scheme"));
    }
}

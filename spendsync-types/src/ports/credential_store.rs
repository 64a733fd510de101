//! Credential store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (InMemory, SQLite) implement this trait.

use crate::domain::{User, UserId};
use crate::dto::UpdateProfileRequest;
use crate::error::RepoError;

/// Persistence for user records and their password digests.
///
/// Email and username are both unique; implementations MUST reject a
/// duplicate with [`RepoError::Conflict`] atomically with the insert.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persists a new user.
    async fn create_user(&self, user: User) -> Result<User, RepoError>;

    /// Finds a user by email (case-insensitive) or exact username.
    async fn find_by_login_identifier(&self, identifier: &str) -> Result<Option<User>, RepoError>;

    /// Gets a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Applies a partial profile update, returning the updated user.
    async fn update_profile(
        &self,
        id: UserId,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>, RepoError>;
}

//! In-memory credential store backed by DashMap.
//!
//! Used for tests, demos and `DATABASE_URL=memory://`. Uniqueness of email
//! and username is enforced through two index maps whose entries are claimed
//! before the user record is published.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use spendsync_types::{CredentialStore, RepoError, UpdateProfileRequest, User, UserId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
    by_username: DashMap<String, UserId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn conflict() -> RepoError {
        RepoError::Conflict("User already exists".into())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(Self::conflict()),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        match self.by_username.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                self.by_email.remove(&user.email);
                return Err(Self::conflict());
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_login_identifier(&self, identifier: &str) -> Result<Option<User>, RepoError> {
        let identifier = identifier.trim();
        let id = self
            .by_email
            .get(&identifier.to_lowercase())
            .or_else(|| self.by_username.get(identifier))
            .map(|entry| *entry.value());

        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>, RepoError> {
        Ok(self.users.get_mut(&id).map(|mut entry| {
            let user = entry.value_mut();
            update.apply_to(user);
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            "Test User".to_string(),
            email,
            "$2b$04$digest".to_string(),
            "US".to_string(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let store = MemoryStore::new();
        let created = store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let store = MemoryStore::new();
        let created = store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let found = store
            .find_by_login_identifier(" ALICE@example.com ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let store = MemoryStore::new();
        let created = store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let found = store.find_by_login_identifier("alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(store.find_by_login_identifier("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let result = store.create_user(user("alice2", "alice@example.com")).await;
        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts_and_releases_email() {
        let store = MemoryStore::new();
        store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let result = store.create_user(user("alice", "other@example.com")).await;
        assert!(matches!(result, Err(RepoError::Conflict(_))));

        // The email claimed by the failed insert is free again
        store.create_user(user("carol", "other@example.com")).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let store = MemoryStore::new();
        let created = store.create_user(user("alice", "alice@example.com")).await.unwrap();

        let updated = store
            .update_profile(
                created.id,
                UpdateProfileRequest {
                    bio: Some("hello".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.bio.as_deref(), Some("hello"));
        assert!(
            store
                .update_profile(UserId::new(), UpdateProfileRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}

//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use spendsync_types::{CredentialStore, RepoError, UpdateProfileRequest, User, UserId};

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            "Test User".to_string(),
            email,
            "$2b$04$digest".to_string(),
            "US".to_string(),
            Some("eur".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let repo = setup_repo().await;

        let created = repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(created.username, "alice");
        assert_eq!(created.currency, "EUR");
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips_all_fields() {
        let repo = setup_repo().await;
        let created = repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.password_hash, created.password_hash);
        assert_eq!(fetched.created_at.timestamp(), created.created_at.timestamp());
        assert!(fetched.bio.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = setup_repo().await;

        let result = repo.find_by_id(UserId::new()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_or_username() {
        let repo = setup_repo().await;
        let created = repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        let by_email = repo
            .find_by_login_identifier("Alice@Example.com")
            .await
            .unwrap()
            .unwrap();
        let by_username = repo.find_by_login_identifier("alice").await.unwrap().unwrap();

        assert_eq!(by_email.id, created.id);
        assert_eq!(by_username.id, created.id);
        assert!(repo.find_by_login_identifier("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = setup_repo().await;
        repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        let result = repo.create_user(user("alice2", "alice@example.com")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = setup_repo().await;
        repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        let result = repo.create_user(user("alice", "other@example.com")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_absent_fields() {
        let repo = setup_repo().await;
        let created = repo.create_user(user("alice", "alice@example.com")).await.unwrap();

        let updated = repo
            .update_profile(
                created.id,
                UpdateProfileRequest {
                    full_name: Some("  Alice Liddell ".into()),
                    currency: Some("gbp".into()),
                    bio: Some("Budgets every Sunday".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.full_name, "Alice Liddell");
        assert_eq!(updated.currency, "GBP");
        assert_eq!(updated.country, "US");
        assert_eq!(updated.bio.as_deref(), Some("Budgets every Sunday"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let repo = setup_repo().await;

        let result = repo
            .update_profile(UserId::new(), UpdateProfileRequest::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }
}

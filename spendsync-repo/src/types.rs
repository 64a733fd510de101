//! Database row types for the SQLite adapter.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use spendsync_types::{RepoError, User, UserId};

/// User row from the `users` table. SQLite stores ids and timestamps as TEXT.
#[derive(FromRow)]
pub struct DbUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub country: String,
    pub currency: String,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DbUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepoError::Database(format!("invalid user id {}: {}", self.id, e)))?;

        Ok(User {
            id: UserId::from_uuid(id),
            username: self.username,
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            country: self.country,
            currency: self.currency,
            profile_photo: self.profile_photo,
            bio: self.bio,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(format!("invalid timestamp {}: {}", raw, e)))
}

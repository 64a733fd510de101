//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Unique handle (letters, digits, underscores)
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice Liddell")]
    pub full_name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Plaintext password, at least 8 characters
    #[schema(example = "Secret123!")]
    pub password: String,
    #[schema(example = "GB")]
    pub country: String,
    /// ISO currency code, defaults to USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "GBP")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

/// Request to log in with an email address or a username.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email or username
    #[serde(alias = "email", alias = "username")]
    #[schema(example = "alice@example.com")]
    pub login: String,
    #[schema(example = "Secret123!")]
    pub password: String,
}

/// Response carrying a freshly issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// When the token stops being accepted
    #[schema(value_type = String, example = "2024-01-08T00:00:00Z")]
    pub expires_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Public projection of a user. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            country: user.country.clone(),
            currency: user.currency.clone(),
            profile_photo: user.profile_photo.clone(),
            bio: user.bio.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    /// Trims names and upper-cases the currency code.
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.map(|s| s.trim().to_string()),
            country: self.country.map(|s| s.trim().to_string()),
            currency: self.currency.map(|s| s.trim().to_uppercase()),
            profile_photo: self.profile_photo,
            bio: self.bio,
        }
    }

    /// Applies the present fields to `user` and bumps `updated_at`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(full_name) = &self.full_name {
            user.full_name = full_name.trim().to_string();
        }
        if let Some(country) = &self.country {
            user.country = country.trim().to_string();
        }
        if let Some(currency) = &self.currency {
            user.currency = currency.trim().to_uppercase();
        }
        if let Some(photo) = &self.profile_photo {
            user.profile_photo = Some(photo.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        user.updated_at = Utc::now();
    }
}

/// Body of the logout response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_email_or_username_key() {
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"x"}"#).unwrap();
        assert_eq!(by_email.login, "a@b.co");

        let by_username: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"x"}"#).unwrap();
        assert_eq!(by_username.login, "alice");
    }

    #[test]
    fn test_profile_omits_password_digest() {
        let user = User::new(
            "alice".into(),
            "Alice".into(),
            "alice@example.com",
            "$2b$10$secretdigest".into(),
            "GB".into(),
            None,
        )
        .unwrap();

        let json = serde_json::to_string(&UserProfile::from(&user)).unwrap();
        assert!(!json.contains("secretdigest"));
        assert!(json.contains("\"fullName\":\"Alice\""));
    }

    #[test]
    fn test_update_profile_applies_only_present_fields() {
        let mut user = User::new(
            "alice".into(),
            "Alice".into(),
            "alice@example.com",
            "hash".into(),
            "GB".into(),
            None,
        )
        .unwrap();

        let update = UpdateProfileRequest {
            bio: Some("Budgeting nerd".into()),
            currency: Some("gbp".into()),
            ..Default::default()
        };
        update.apply_to(&mut user);

        assert_eq!(user.full_name, "Alice");
        assert_eq!(user.currency, "GBP");
        assert_eq!(user.bio.as_deref(), Some("Budgeting nerd"));
    }
}

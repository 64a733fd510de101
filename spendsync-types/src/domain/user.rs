//! User domain model (the credential record).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Currency assigned when registration does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered user with a salted password digest.
///
/// `Debug` is derived, so never log a `User` at a level that ships to
/// external collectors; use [`crate::UserProfile`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique handle, `[A-Za-z0-9_]+`
    pub username: String,
    pub full_name: String,
    /// Unique, stored trimmed and lower-cased
    pub email: String,
    /// bcrypt digest (salt embedded)
    pub password_hash: String,
    pub country: String,
    pub currency: String,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user from registration data and an already computed digest.
    ///
    /// # Validation
    /// - Username must be non-empty and contain only ASCII letters, digits or `_`
    /// - Full name and country cannot be blank
    /// - Email must look like `local@domain`
    pub fn new(
        username: String,
        full_name: String,
        email: &str,
        password_hash: String,
        country: String,
        currency: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_username(&username)?;
        if full_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Full name cannot be empty".into(),
            ));
        }
        if country.trim().is_empty() {
            return Err(DomainError::ValidationError("Country cannot be empty".into()));
        }
        let email = normalize_email(email)?;

        let currency = currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            username,
            full_name: full_name.trim().to_string(),
            email,
            password_hash,
            country: country.trim().to_string(),
            currency,
            profile_photo: None,
            bio: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if `identifier` names this user by email or username.
    pub fn matches_login(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.username == identifier || self.email == identifier.to_lowercase()
    }
}

/// Checks the username charset.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::ValidationError(
            "Username cannot be empty".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(DomainError::ValidationError(
            "Username may only contain letters, digits and underscores".into(),
        ));
    }
    Ok(())
}

/// Trims and lower-cases an email address, rejecting obviously invalid ones.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::ValidationError("Invalid email address".into())),
    }
}

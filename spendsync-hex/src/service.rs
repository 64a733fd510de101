//! Account Application Service
//!
//! Orchestrates registration, login and profile operations through the
//! credential store port. Contains NO infrastructure logic - HTTP concerns
//! live in `inbound`, storage in the injected adapter.

use std::sync::Arc;

use spendsync_auth::{BcryptHasher, IssuedToken, MAX_PASSWORD_BYTES, TokenIssuer};
use spendsync_types::domain::user::{normalize_email, validate_username};
use spendsync_types::{
    AppError, AuthError, AuthResponse, CredentialStore, LoginRequest, RegisterRequest,
    UpdateProfileRequest, User, UserId, UserProfile,
};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Application service for account operations.
///
/// Generic over `S: CredentialStore` - the adapter is injected at compile time.
pub struct AuthService<S: CredentialStore> {
    store: S,
    hasher: BcryptHasher,
    tokens: Arc<TokenIssuer>,
}

impl<S: CredentialStore> AuthService<S> {
    /// Creates a new service with the given store, hasher and token issuer.
    pub fn new(store: S, hasher: BcryptHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Returns a reference to the underlying credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the shared token issuer, used by the authorization middleware.
    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Credential Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a new account and issues its first token.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let username = req.username.trim().to_string();
        validate_username(&username)?;
        let email = normalize_email(&req.email)?;
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if req.password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::BadRequest(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        // Early duplicate check; the store still enforces uniqueness on insert
        if self.store.find_by_login_identifier(&email).await?.is_some()
            || self.store.find_by_login_identifier(&username).await?.is_some()
        {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let digest = self.hash_password(req.password).await?;
        let mut user = User::new(
            username,
            req.full_name,
            &email,
            digest,
            req.country,
            req.currency,
        )?;
        user.profile_photo = req.profile_photo;

        let user = self.store.create_user(user).await?;
        tracing::info!(user_id = %user.id, "registered new account");

        let issued = self.issue_token(user.id)?;
        Ok(auth_response(&user, issued))
    }

    /// Authenticates by email or username and issues a token.
    ///
    /// Unknown account and wrong password are indistinguishable to the caller,
    /// in the response and in the bcrypt work done.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let Some(user) = self.store.find_by_login_identifier(&req.login).await? else {
            tracing::debug!("login for unknown account");
            self.verify_decoy(req.password).await?;
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self
            .verify_password(req.password, user.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = self.issue_token(user.id)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(auth_response(&user, issued))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Profile Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the profile of an authenticated user.
    pub async fn me(&self, id: UserId) -> Result<UserProfile, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Applies a partial profile update.
    pub async fn update_profile(
        &self,
        id: UserId,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        let req = req.normalized();
        if req.full_name.as_deref() == Some("") {
            return Err(AppError::BadRequest("Full name cannot be empty".into()));
        }
        if req.country.as_deref() == Some("") {
            return Err(AppError::BadRequest("Country cannot be empty".into()));
        }
        if req.currency.as_deref() == Some("") {
            return Err(AppError::BadRequest("Currency cannot be empty".into()));
        }

        self.store
            .update_profile(id, req)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))
    }

    async fn verify_decoy(&self, password: String) -> Result<(), AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_decoy(&password))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))
    }

    fn issue_token(&self, user_id: UserId) -> Result<IssuedToken, AppError> {
        self.tokens
            .issue(user_id)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }
}

fn auth_response(user: &User, issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        user: UserProfile::from(user),
        token: issued.token,
        expires_at: issued.expires_at,
    }
}

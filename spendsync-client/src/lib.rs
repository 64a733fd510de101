//! # SpendSync Client SDK
//!
//! A typed Rust client for the SpendSync auth API.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use spendsync_types::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UpdateProfileRequest,
    UserProfile,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not logged in: no bearer token set")]
    MissingToken,
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// SpendSync API client.
#[derive(Clone)]
pub struct SpendSyncClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl SpendSyncClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token sent with authenticated requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The bearer token in use, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a new account. The returned token is not stored; use [`Self::with_token`].
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let request = self.http.post(self.url("/api/auth/register")).json(req);
        self.send(request).await
    }

    /// Logs in with an email address or username.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.url("/api/auth/login")).json(&req);
        self.send(request).await
    }

    /// Fetches the profile of the token's owner.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let request = self.authorized(self.http.get(self.url("/api/auth/me")))?;
        self.send(request).await
    }

    /// Updates the profile of the token's owner.
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        let request = self
            .authorized(self.http.put(self.url("/api/auth/profile")))?
            .json(update);
        self.send(request).await
    }

    /// Tells the server the session ended. The token itself stays valid until expiry.
    pub async fn logout(&self) -> Result<LogoutResponse, ClientError> {
        let request = self.authorized(self.http.post(self.url("/api/auth/logout")))?;
        self.send(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SpendSyncClient::new("http://localhost:4000");
        assert_eq!(client.base_url, "http://localhost:4000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = SpendSyncClient::new("http://localhost:4000/");
        assert_eq!(client.url("/health"), "http://localhost:4000/health");
    }

    #[test]
    fn test_client_with_token() {
        let client = SpendSyncClient::new("http://localhost:4000").with_token("abc.def.ghi");
        assert_eq!(client.token(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_authenticated_call_without_token_fails_locally() {
        let client = SpendSyncClient::new("http://127.0.0.1:9");
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingToken));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_status() {
        let err = ClientError::Api {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "API error: 401 - Unauthorized");
    }
}

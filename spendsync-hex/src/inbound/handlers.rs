//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use spendsync_types::{
    AppError, AuthError, AuthResponse, CredentialStore, LoginRequest, LogoutResponse,
    RegisterRequest, UpdateProfileRequest,
};

use super::auth::AuthUser;
use crate::AuthService;
use crate::openapi::ApiDoc;

/// Response header echoing a freshly issued token.
pub const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");

/// Application state shared across handlers.
pub struct AppState<S: CredentialStore> {
    pub service: AuthService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials.to_string(),
            ),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::TooManyRequests { retry_after_secs } => {
                let body = serde_json::json!({
                    "error": "Too many requests",
                    "retry_after_seconds": retry_after_secs
                });
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(RETRY_AFTER, retry_after_secs.to_string())],
                    Json(body),
                )
                    .into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning axum's plain-text rejection into a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "rejected request body");
            Err(ApiError(AppError::BadRequest(rejection.body_text())))
        }
    }
}

/// Router fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError(AppError::NotFound("Not Found".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

fn with_token_header(status: StatusCode, resp: AuthResponse) -> Response {
    (status, [(X_AUTH_TOKEN, resp.token.clone())], Json(resp)).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Credential endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Register a new account.
#[tracing::instrument(skip(state, payload), fields(username = tracing::field::Empty))]
pub async fn register<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(payload)?;
    tracing::Span::current().record("username", req.username.as_str());
    let resp = state.service.register(req).await?;
    Ok(with_token_header(StatusCode::CREATED, resp))
}

/// Log in with email or username.
#[tracing::instrument(skip(state, payload))]
pub async fn login<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(payload)?;
    let resp = state.service.login(req).await?;
    Ok(with_token_header(StatusCode::OK, resp))
}

/// Log out. Tokens are stateless, so this only acknowledges the request.
#[tracing::instrument(skip(user), fields(user_id = %user.id))]
pub async fn logout(user: AuthUser) -> impl IntoResponse {
    tracing::info!("logout acknowledged");
    Json(LogoutResponse { ok: true })
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Current user's profile.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn me<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.service.me(user.id).await?;
    Ok(Json(profile))
}

/// Update the current user's profile.
#[tracing::instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_profile<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let profile = state.service.update_profile(user.id, req).await?;
    Ok(Json(profile))
}

//! Authorization middleware for bearer tokens.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use spendsync_auth::TokenIssuer;
use spendsync_types::{AppError, AuthError, IdentityClaim, UserId};

use super::handlers::ApiError;

/// Identity of the caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub claim: IdentityClaim,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError(AppError::Unauthorized(AuthError::MissingToken)))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
/// The scheme is matched case-insensitively; any other scheme counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Verifies the bearer token and attaches [`AuthUser`] to the request.
///
/// Rejects with 401 before the handler runs when the token is missing,
/// malformed, expired or signed with another secret. Never touches storage.
pub async fn require_auth(
    State(tokens): State<Arc<TokenIssuer>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let verified = bearer_token(request.headers())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| tokens.verify(token));

    match verified {
        Ok(claim) => {
            request.extensions_mut().insert(AuthUser {
                id: claim.sub,
                claim,
            });
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!(%reason, path = %request.uri().path(), "rejected bearer token");
            ApiError(AppError::Unauthorized(reason)).into_response()
        }
    }
}

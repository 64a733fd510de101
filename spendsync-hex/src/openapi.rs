//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use spendsync_types::domain::UserId;
use spendsync_types::dto::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UpdateProfileRequest,
    UserProfile,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, token issued (also in the x-auth-token header)", body = AuthResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "User already exists"),
        (status = 429, description = "Too many requests")
    )
)]
async fn register() {}

/// Log in with email or username
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued (also in the x-auth-token header)", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many requests")
    )
)]
async fn login() {}

/// Log out (client discards the token)
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized")
    )
)]
async fn logout() {}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile of the caller", body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
async fn me() {}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid profile data"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
async fn update_profile() {}

/// OpenAPI documentation for the SpendSync auth API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SpendSync Auth API",
        version = "1.0.0",
        description = "Account registration, login and profile endpoints of the SpendSync expense tracker.\n\n## Authentication\n\nRegister or log in to obtain a token, then include it in the `Authorization` header:\n\n```\nAuthorization: Bearer <token>\n```\n\nTokens expire after seven days by default.",
        license(name = "MIT"),
    ),
    paths(
        health,
        register,
        login,
        logout,
        me,
        update_profile,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            UpdateProfileRequest,
            LogoutResponse,
            UserId,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and logout"),
        (name = "profile", description = "Current user's profile"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_auth_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/me",
            "/api/auth/profile",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}

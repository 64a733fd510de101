//! # SpendSync Hex
//!
//! Application service layer and HTTP adapter for the SpendSync auth gateway.
//!
//! ## Architecture
//!
//! - `service/` - Account service (registration, login, profile)
//! - `inbound/` - HTTP adapter (Axum server, authorization and rate limiting middleware)
//! - `openapi` - OpenAPI document served at `/api-docs/openapi.json`
//!
//! The service is generic over `S: CredentialStore`, allowing
//! different store implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::{AuthService, MIN_PASSWORD_LEN};

//! # SpendSync Types
//!
//! Domain types and port traits for the SpendSync authentication gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (User, UserId, IdentityClaim)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Auth, domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{IdentityClaim, User, UserId};
pub use dto::*;
pub use error::{AppError, AuthError, DomainError, RepoError};
pub use ports::CredentialStore;

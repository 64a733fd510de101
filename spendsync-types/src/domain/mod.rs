//! Domain models for the auth gateway.

pub mod claims;
pub mod user;

pub use claims::IdentityClaim;
pub use user::{User, UserId};

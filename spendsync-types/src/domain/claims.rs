//! Identity claim carried inside a bearer token.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Decoded payload of a bearer token.
///
/// Timestamps are Unix seconds, matching the registered JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Subject: the authenticated user.
    pub sub: UserId,
    /// Issued-at.
    pub iat: i64,
    /// Expiry.
    pub exp: i64,
}

impl IdentityClaim {
    pub fn new(sub: UserId, iat: i64, exp: i64) -> Self {
        Self { sub, iat, exp }
    }
}

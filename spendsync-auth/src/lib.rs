//! # SpendSync Auth
//!
//! Credential primitives for the SpendSync gateway. Everything here is
//! synchronous and IO-free:
//!
//! - `password` - salted bcrypt hashing with a tunable cost
//! - `token` - HS256 bearer token issuance and verification
//! - `rate_limit` - fixed-window admission counter keyed by client identity

pub mod password;
pub mod rate_limit;
pub mod token;

pub use password::{BcryptHasher, DEFAULT_COST, MAX_PASSWORD_BYTES, PasswordError};
pub use rate_limit::{Admission, FixedWindowLimiter, RateLimiter};
pub use token::{DEFAULT_TOKEN_TTL, IssuedToken, TokenConfigError, TokenIssuer};

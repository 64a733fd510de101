//! Salted password hashing with bcrypt.

use std::sync::Arc;

/// Default bcrypt cost. Tens of milliseconds per hash on current hardware.
pub const DEFAULT_COST: u32 = 10;

/// Longest password bcrypt reads in full; later bytes would be ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

const DECOY_PLAINTEXT: &str = "spendsync-decoy-credential";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt cost {0} out of range (4..=31)")]
    InvalidCost(u32),

    #[error("password exceeds 72 bytes")]
    TooLong,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hashes and verifies passwords. Each digest embeds its own random salt.
///
/// Also holds a decoy digest at the same cost, so a lookup miss can pay for a
/// full verification like a wrong password does.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
    decoy: Arc<str>,
}

impl BcryptHasher {
    /// Creates a hasher with the given cost factor.
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        let decoy = bcrypt::hash(DECOY_PLAINTEXT, cost)?;
        Ok(Self {
            cost,
            decoy: decoy.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces a salted one-way digest of `plaintext`.
    ///
    /// Refuses passwords longer than [`MAX_PASSWORD_BYTES`].
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Checks `plaintext` against `digest`.
    ///
    /// Returns false on mismatch, on a malformed or empty digest and on a
    /// plaintext longer than [`MAX_PASSWORD_BYTES`].
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        if digest.is_empty() {
            return false;
        }
        if plaintext.len() > MAX_PASSWORD_BYTES {
            // Same work as a real check, then reject
            let _ = bcrypt::verify(&plaintext.as_bytes()[..MAX_PASSWORD_BYTES], digest);
            return false;
        }
        match bcrypt::verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored password digest could not be parsed");
                false
            }
        }
    }

    /// Runs a full verification against the decoy digest and discards it.
    pub fn verify_decoy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.decoy);
    }
}

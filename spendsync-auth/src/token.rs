//! Bearer token issuance and verification (HS256 JWS).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use spendsync_types::{AuthError, IdentityClaim, UserId};

/// Seven days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Misconfiguration detected while building a [`TokenIssuer`].
#[derive(Debug, thiserror::Error)]
pub enum TokenConfigError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("token lifetime must be between 1 second and 10 years")]
    InvalidTtl,
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies identity claims with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer. An empty secret is refused outright.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenConfigError> {
        if secret.trim().is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        let ttl_secs = ttl.as_secs();
        if ttl_secs == 0 || ttl_secs > 10 * 365 * 24 * 60 * 60 {
            return Err(TokenConfigError::InvalidTtl);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: ttl_secs as i64,
        })
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issues a token for `user_id` valid from now.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let iat = now.timestamp();
        let exp = iat + self.ttl_secs;
        let claim = IdentityClaim::new(user_id, iat, exp);

        let token = encode(&Header::new(Algorithm::HS256), &claim, &self.encoding_key)?;
        tracing::debug!(user_id = %user_id, exp, "issued bearer token");

        Ok(IssuedToken {
            token,
            expires_at: now + chrono::Duration::seconds(self.ttl_secs),
        })
    }

    /// Checks signature and expiry, returning the embedded claim.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        decode::<IdentityClaim>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret, DEFAULT_TOKEN_TTL).unwrap()
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let tokens = issuer("test-secret-key-12345");
        let user_id = UserId::new();

        let issued = tokens.issue(user_id).unwrap();
        let claim = tokens.verify(&issued.token).unwrap();

        assert_eq!(claim.sub, user_id);
        assert_eq!(claim.exp - claim.iat, 7 * 24 * 60 * 60);
        assert_eq!(issued.expires_at.timestamp(), claim.exp);
    }

    #[test]
    fn test_expired_token_rejected_with_expiry_error() {
        let tokens = issuer("test-secret-key-12345");
        let eight_days_ago = Utc::now() - chrono::Duration::days(8);

        let issued = tokens.issue_at(UserId::new(), eight_days_ago).unwrap();

        assert_eq!(tokens.verify(&issued.token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn test_different_secret_rejected_with_signature_error() {
        let issued = issuer("secret-one").issue(UserId::new()).unwrap();

        assert_eq!(
            issuer("secret-two").verify(&issued.token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let tokens = issuer("test-secret-key-12345");
        assert_eq!(tokens.verify(""), Err(AuthError::MalformedToken));
        assert_eq!(
            tokens.verify("invalid.token.here"),
            Err(AuthError::MalformedToken)
        );
        assert_eq!(tokens.verify("no-dots"), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let tokens = issuer("test-secret-key-12345");
        let issued = tokens.issue(UserId::new()).unwrap();

        let forged = issuer("attacker").issue(UserId::new()).unwrap();
        let forged_payload = forged.token.split('.').nth(1).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = forged_payload;

        assert_eq!(
            tokens.verify(&parts.join(".")),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_last_char_rejected() {
        let tokens = issuer("test-secret-key-12345");
        let mut token = tokens.issue(UserId::new()).unwrap().token;

        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        let secret = "test-secret-key-12345";
        let claims = serde_json::json!({ "sub": "not-a-uuid", "iat": 0, "exp": 4102444800i64 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(issuer(secret).verify(&token), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(matches!(
            TokenIssuer::new("", DEFAULT_TOKEN_TTL),
            Err(TokenConfigError::EmptySecret)
        ));
        assert!(matches!(
            TokenIssuer::new("   ", DEFAULT_TOKEN_TTL),
            Err(TokenConfigError::EmptySecret)
        ));
    }

    #[test]
    fn test_zero_ttl_refused() {
        assert!(matches!(
            TokenIssuer::new("secret", Duration::ZERO),
            Err(TokenConfigError::InvalidTtl)
        ));
    }
}

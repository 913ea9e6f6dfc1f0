//! Credential and token service.
//!
//! [`AuthService`] is built once at start-up from [`AppConfig`] and shared through the
//! HTTP state. It hashes passwords with Argon2id (random salt per password, PHC string
//! output) and issues HS256 bearer tokens whose subject is the user id.

use crate::{
    config::AppConfig,
    errors::{Error, Result},
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{
        SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token type reported alongside issued tokens
pub const TOKEN_TYPE: &str = "bearer";

/// Claims carried in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per JWT convention
    pub sub: String,
    /// Email of the user at issue time
    pub email: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl Claims {
    /// Numeric user id from `sub`, if it parses.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Hashes and verifies passwords, issues and verifies bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a service signing tokens with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl,
        }
    }

    /// Builds the service from application settings.
    ///
    /// Without a configured secret a random one is generated, so tokens stop
    /// verifying after a restart. [`AppConfig::validate`] only allows that when
    /// authentication is disabled.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let ttl = Duration::minutes(config.token_ttl_minutes);
        if let Some(secret) = &config.jwt_secret {
            return Ok(Self::new(secret.as_bytes(), ttl));
        }

        warn!("No JWT secret configured; using an ephemeral signing key");
        let mut secret = [0_u8; 32];
        OsRng
            .try_fill_bytes(&mut secret)
            .map_err(|e| Error::Config {
                message: format!("Failed to generate signing key: {e}"),
            })?;
        Ok(Self::new(&secret, ttl))
    }

    /// Hashes a plain-text password into a PHC string.
    pub fn hash_password(&self, plain: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash {
                message: e.to_string(),
            })
    }

    /// Checks a plain-text password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    #[must_use]
    pub fn verify_password(&self, plain: &str, hashed: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    /// Issues a token for the given user.
    pub fn issue_token(&self, user_id: i64, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        debug!(user_id, "Issued access token");
        Ok(token)
    }

    /// Verifies signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| Error::Unauthorized {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn service() -> AuthService {
        AuthService::new(b"test-secret", Duration::minutes(30))
    }

    #[test]
    fn test_hash_and_verify_password() -> Result<()> {
        let auth = service();
        let hash = auth.hash_password("hunter2")?;

        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$argon2"));
        assert!(auth.verify_password("hunter2", &hash));
        assert!(!auth.verify_password("hunter3", &hash));
        Ok(())
    }

    #[test]
    fn test_same_password_gets_different_salts() -> Result<()> {
        let auth = service();
        let first = auth.hash_password("same")?;
        let second = auth.hash_password("same")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn test_verify_against_malformed_hash_is_false() {
        assert!(!service().verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_token_round_trip_carries_user() -> Result<()> {
        let auth = service();
        let token = auth.issue_token(42, "ada@example.com")?;
        let claims = auth.verify_token(&token)?;

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
        Ok(())
    }

    #[test]
    fn test_token_from_other_secret_rejected() -> Result<()> {
        let token = service().issue_token(1, "a@b.c")?;
        let other = AuthService::new(b"other-secret", Duration::minutes(30));
        assert!(matches!(
            other.verify_token(&token),
            Err(Error::Unauthorized { message: _ })
        ));
        Ok(())
    }

    #[test]
    fn test_expired_token_rejected() -> Result<()> {
        let auth = AuthService::new(b"test-secret", Duration::minutes(-10));
        let token = auth.issue_token(1, "a@b.c")?;
        assert!(auth.verify_token(&token).is_err());
        Ok(())
    }

    #[test]
    fn test_from_config_without_secret_still_issues() -> Result<()> {
        let config = AppConfig {
            require_auth: false,
            ..AppConfig::default()
        };
        let auth = AuthService::from_config(&config)?;
        let token = auth.issue_token(7, "x@y.z")?;
        assert_eq!(auth.verify_token(&token)?.user_id(), Some(7));
        Ok(())
    }
}

//! Admin access tokens: HS256 JWTs whose subject is the admin username.
//!
//! The same tokens authenticate HTTP requests (`Authorization: Bearer`) and
//! WebSocket connections (`?token=` query parameter).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use donation_common::IdKind;

use crate::error::ApiError;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Admin username.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly minted token and its lifetime in seconds.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signing and verification keys derived from the shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn from_secret(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Mint a token for `username`.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, ApiError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: IdKind::Token.generate(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| {
                tracing::error!(?e, "failed to sign access token");
                ApiError::internal("Token signing failed")
            })?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Validate signature and expiry and return the admin username.
    pub fn verify(&self, token: &str) -> Result<String, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!(?e, "access token validation failed");
                ApiError::unauthorized("Invalid or expired token")
            })?;

        if data.claims.sub.is_empty() {
            return Err(ApiError::unauthorized("Token has no subject"));
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let keys = TokenKeys::from_secret("s3cret", 30);
        let issued = keys.issue("alice").unwrap();
        assert_eq!(issued.expires_in, 1800);
        assert_eq!(keys.verify(&issued.token).unwrap(), "alice");
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = TokenKeys::from_secret("s3cret", 30);
        let theirs = TokenKeys::from_secret("other", 30);
        let issued = theirs.issue("alice").unwrap();
        assert_eq!(ours.verify(&issued.token).unwrap_err().status, 401);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::from_secret("s3cret", -5);
        let issued = keys.issue("alice").unwrap();
        assert!(keys.verify(&issued.token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = TokenKeys::from_secret("s3cret", 30);
        assert!(keys.verify("not-a-jwt").is_err());
        assert!(keys.verify("").is_err());
    }
}

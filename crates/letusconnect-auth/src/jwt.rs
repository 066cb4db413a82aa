// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HS256 JWT issue and verify.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use letusconnect_core::traits::auth::TokenVerifier;
use letusconnect_core::{AuthenticatedUser, ConnectError};

/// Registered claims carried by a LetUsConnect bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: i64,
}

/// Verifies HS256 bearer tokens against a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, ConnectError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(reason = ?e.kind(), "bearer token rejected");
            ConnectError::Unauthenticated
        })?;

        if data.claims.sub.is_empty() {
            debug!("bearer token rejected: empty subject");
            return Err(ConnectError::Unauthenticated);
        }

        Ok(AuthenticatedUser::new(data.claims.sub))
    }
}

/// Mints HS256 tokens with the same secret the verifier uses.
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id` valid for `ttl` from now.
    pub fn issue(&self, user_id: &str, ttl: Duration) -> Result<String, ConnectError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs())
            .map_err(|_| ConnectError::Internal("token ttl out of range".to_string()))?;
        self.sign(&Claims {
            sub: user_id.to_string(),
            exp: now.saturating_add(ttl),
            iat: now,
        })
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, ConnectError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| ConnectError::Internal(format!("failed to sign token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET)
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let token = issuer().issue("u1", Duration::from_secs(300)).unwrap();
        let user = JwtVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(user.user_id, "u1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let token = issuer()
            .sign(&Claims {
                sub: "u1".into(),
                exp: now - 3600,
                iat: now - 7200,
            })
            .unwrap();
        let err = JwtVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, ConnectError::Unauthenticated));
    }

    #[test]
    fn foreign_signer_is_rejected() {
        let token = TokenIssuer::new("someone-else")
            .issue("u1", Duration::from_secs(300))
            .unwrap();
        let err = JwtVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, ConnectError::Unauthenticated));
    }

    #[test]
    fn malformed_token_is_rejected() {
        for token in ["", "not-a-jwt", "a.b.c"] {
            let err = JwtVerifier::new(SECRET).verify(token).unwrap_err();
            assert!(matches!(err, ConnectError::Unauthenticated), "{token}");
        }
    }

    #[test]
    fn rejections_are_indistinguishable() {
        let verifier = JwtVerifier::new(SECRET);
        let now = Utc::now().timestamp();
        let expired = issuer()
            .sign(&Claims {
                sub: "u1".into(),
                exp: now - 10,
                iat: now - 20,
            })
            .unwrap();
        let foreign = TokenIssuer::new("other")
            .issue("u1", Duration::from_secs(60))
            .unwrap();

        let messages: Vec<String> = ["garbage", expired.as_str(), foreign.as_str()]
            .iter()
            .map(|t| verifier.verify(t).unwrap_err().to_string())
            .collect();
        assert!(messages.iter().all(|m| m == "invalid or expired token"));
    }

    #[test]
    fn empty_subject_is_rejected() {
        let token = issuer().issue("", Duration::from_secs(60)).unwrap();
        assert!(JwtVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn token_without_expiry_is_rejected() {
        let header = Header::new(Algorithm::HS256);
        let claims = serde_json::json!({"sub": "u1"});
        let token = encode(&header, &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        assert!(JwtVerifier::new(SECRET).verify(&token).is_err());
    }
}

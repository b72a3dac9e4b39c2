//! Token Service
//!
//! Issues and verifies HS256 JWTs. Access and refresh tokens are signed
//! with separate secrets, so one can never be used as the other.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// User ID
    pub sub: String,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expires at (epoch seconds)
    pub exp: i64,
}

/// Result of a successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub issued_at: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

/// Tokens handed out on signup, login and password change
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Access/refresh token issuer
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            access: SigningKeys::new(&config.access_token_secret, config.access_token_ttl),
            refresh: SigningKeys::new(&config.refresh_token_secret, config.refresh_token_ttl),
            validation,
        }
    }

    pub fn sign_access(&self, user_id: &UserId) -> AuthResult<String> {
        Self::sign(&self.access, user_id)
    }

    pub fn sign_refresh(&self, user_id: &UserId) -> AuthResult<String> {
        Self::sign(&self.refresh, user_id)
    }

    pub fn issue_pair(&self, user_id: &UserId) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign_access(user_id)?,
            refresh_token: self.sign_refresh(user_id)?,
        })
    }

    /// Fails with `TokenExpired` or `TokenInvalid`
    pub fn verify_access(&self, token: &str) -> AuthResult<VerifiedToken> {
        self.verify(&self.access, token)
    }

    /// Fails with `TokenExpired` or `TokenInvalid`
    pub fn verify_refresh(&self, token: &str) -> AuthResult<VerifiedToken> {
        self.verify(&self.refresh, token)
    }

    fn sign(keys: &SigningKeys, user_id: &UserId) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + keys.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    fn verify(&self, keys: &SigningKeys, token: &str) -> AuthResult<VerifiedToken> {
        let data = decode::<TokenClaims>(token, &keys.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::TokenInvalid)?;

        Ok(VerifiedToken {
            user_id,
            issued_at: data.claims.iat,
        })
    }
}

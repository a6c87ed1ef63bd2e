//! Session token codec: HS256 JWTs carrying the user's email.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::AppError;
use crate::models::SessionClaims;

/// Lifetime of a session token.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60;

/// Why a token was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Invalid(reason) => write!(f, "invalid token: {}", reason),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs and verifies session tokens with a process-wide secret.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: TimeDelta,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TimeDelta::seconds(SESSION_TTL_SECONDS),
        }
    }

    /// Sign a token for `email`, valid for one hour.
    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

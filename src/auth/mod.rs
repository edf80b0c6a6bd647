pub mod password;

use std::str::FromStr;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Claims carried by every bearer token. `sub` and `email` both hold the
/// account's email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims expiring `expiry_hours` from now. Fails when the expiry does not
    /// fit in a timestamp.
    pub fn new(email: impl Into<String>, expiry_hours: u64) -> Result<Self, JwtError> {
        let email = email.into();
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?
            .timestamp();

        Ok(Self {
            sub: email.clone(),
            email,
            jti: Uuid::new_v4(),
            exp,
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Only shared-secret algorithms make sense with a single configured secret.
fn algorithm(security: &SecurityConfig) -> Result<Algorithm, JwtError> {
    match Algorithm::from_str(&security.jwt_algorithm) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(JwtError::UnsupportedAlgorithm(security.jwt_algorithm.clone())),
    }
}

/// Issue a signed token for `email`.
pub fn generate_jwt(email: &str, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let claims = Claims::new(email, security.jwt_expiry_hours)?;
    let header = Header::new(algorithm(security)?);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&header, &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Check signature, algorithm and expiry, returning the claims.
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::new(algorithm(security)?);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

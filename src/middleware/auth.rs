use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::validate_jwt;
use crate::config;
use crate::error::ApiError;
use crate::state::AppState;

const INVALID_TOKEN: &str = "Invalid token";

/// Authenticated account. Taking this as a handler argument puts the route
/// behind the bearer token gate.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).map_err(ApiError::unauthorized)?;

        // Signature and expiry first, then the account must still exist.
        // Every failure past this point looks the same to the caller.
        let claims = validate_jwt(&token, &config::config().security).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            ApiError::unauthorized(INVALID_TOKEN)
        })?;

        match state.users.find_by_email(&claims.email).await {
            Ok(Some(_)) => Ok(AuthUser { email: claims.email }),
            Ok(None) => {
                tracing::warn!("Rejected bearer token: account {} no longer exists", claims.email);
                Err(ApiError::unauthorized(INVALID_TOKEN))
            }
            Err(e) => {
                tracing::error!("Account lookup failed during authentication: {}", e);
                Err(ApiError::unauthorized(INVALID_TOKEN))
            }
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing authentication".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

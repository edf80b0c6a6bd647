// handlers/auth.rs - POST /auth token acquisition

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::generate_jwt;
use crate::config;
use crate::error::ApiError;
use crate::middleware::ValidJson;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth - exchange email and password for a bearer token.
///
/// Wrong password, unknown email and lookup failures all answer 401 with the
/// same message.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    match state
        .users
        .verify_password(&credentials.email, &credentials.password)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Failed login for {}", credentials.email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => {
            tracing::error!("Credential lookup failed for {}: {}", credentials.email, e);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    }

    let token = generate_jwt(&credentials.email, &config::config().security).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Could not issue token")
    })?;

    tracing::info!("Issued token for {}", credentials.email);
    Ok(Json(TokenResponse { token }))
}

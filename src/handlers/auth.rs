// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    utils::{
        hash::verify_password,
        jwt::{ADMIN_ROLE, sign_jwt},
    },
};

/// DTO for admin login.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Exchanges the admin password for a bearer token.
pub async fn admin_login(
    State(config): State<Config>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hash = config.admin_password_hash.as_deref().ok_or_else(|| {
        tracing::warn!("Admin login attempted but no admin password is configured");
        AppError::AuthError("Admin password is not configured".to_string())
    })?;

    if !verify_password(&payload.password, hash)? {
        tracing::warn!("Admin login failed: wrong password");
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(ADMIN_ROLE, ADMIN_ROLE, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!("Admin logged in");

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expires_in": config.jwt_expiration
    })))
}

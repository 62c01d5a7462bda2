use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    services::auth as auth_service,
    state::AppState,
    validation::{auth::not_blank, report::validate_payload},
};

/// The request payload for account registration.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(custom(not_blank))]
    pub username: String,
    #[garde(length(chars, min = 6))]
    pub password: String,
    #[garde(email)]
    pub email: String,
}

/// The request payload for login.
///
/// Missing fields read as empty and fail as bad credentials.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

fn invalid_input(rejection: JsonRejection) -> AppError {
    tracing::debug!("Rejected auth payload: {}", rejection);
    AppError::Validation("Invalid input".to_string())
}

/// Handles account registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(invalid_input)?;
    tracing::info!("📝 Register attempt: {}", payload.username);

    validate_payload(&payload)?;

    let (account, token) = auth_service::register(
        &state,
        payload.username.trim(),
        &payload.password,
        &payload.email,
    )
    .await?;

    tracing::info!("✅ Account registered: {}", account.id);

    let response = AuthResponse {
        message: "User registered successfully".to_string(),
        token,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(invalid_input)?;
    tracing::info!("🔐 Login attempt: {}", payload.username);

    let issued = auth_service::login(&state, payload.username.trim(), &payload.password).await?;

    let message = if issued.from_cache {
        "Login successful (from Redis)"
    } else {
        "Login successful"
    };

    let response = AuthResponse {
        message: message.to_string(),
        token: issued.token,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::session::AuthenticatedAccount,
    services::auth as auth_service,
    state::AppState,
};

/// Extracts the bearer token from the `Authorization` header.
///
/// The `Bearer ` prefix is optional.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// A middleware that requires a valid bearer token.
///
/// On success the caller's [`AuthenticatedAccount`] is inserted into the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_bearer_token(&request).ok_or_else(|| {
        AppError::Authentication("Missing or invalid token".to_string())
    })?;

    let account_id = auth_service::validate_token(&state, token)?;

    tracing::debug!("✅ Account authenticated: {}", account_id);

    request
        .extensions_mut()
        .insert(AuthenticatedAccount { account_id });

    Ok(next.run(request).await)
}

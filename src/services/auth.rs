use crate::crypto::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::models::account::Account;
use crate::state::AppState;

/// Message shared by every failed login, so callers cannot tell a missing
/// username from a wrong password.
pub const INVALID_CREDENTIALS: &str = "Username or password incorrect";

/// A token handed out by [`login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The signed token.
    pub token: String,
    /// Whether the token was served from the session cache.
    pub from_cache: bool,
}

/// Mints a token for `account_id` and caches it.
async fn issue_and_cache(state: &AppState, account_id: i64) -> Result<String> {
    let token = state.tokens.issue(account_id)?;

    state
        .sessions
        .store_token(account_id, &token, state.session_cache_ttl_secs())
        .await?;

    tracing::info!("✅ New token cached for account ID: {}", account_id);
    Ok(token)
}

/// Registers a new account and issues its first token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `username` - The account's username.
/// * `password` - The plaintext password.
/// * `email` - The account's email address.
///
/// # Returns
///
/// A `Result` containing the created `Account` and its token. A taken
/// username or email yields [`AppError::Conflict`] and writes nothing.
pub async fn register(
    state: &AppState,
    username: &str,
    password: &str,
    email: &str,
) -> Result<(Account, String)> {
    tracing::debug!("🔐 Creating account: {}", username);
    let hashed_password = hash_password(password)?;

    let account = state
        .accounts
        .insert_if_absent(username, email, &hashed_password)
        .await?
        .ok_or_else(|| AppError::Conflict("Username or email already registered".to_string()))?;

    tracing::info!("✅ Account created with ID: {}", account.id);

    // The account stays even if caching the token fails below.
    let token = issue_and_cache(state, account.id).await?;

    Ok((account, token))
}

/// Authenticates an account and returns its current token.
///
/// A non-empty token already in the session cache is reused as is;
/// otherwise a new one is minted and cached. A failed cache read counts as
/// a miss; a failed cache write is an error.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<IssuedToken> {
    tracing::debug!("🔐 Authenticating account: {}", username);

    let account = state
        .accounts
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &account.password)? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let cached = match state.sessions.get_token(account.id).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Session cache read failed for account ID {}: {}", account.id, e);
            None
        }
    };

    if let Some(token) = cached {
        if !token.is_empty() {
            tracing::info!("✅ Token served from cache for account ID: {}", account.id);
            return Ok(IssuedToken {
                token,
                from_cache: true,
            });
        }
    }

    let token = issue_and_cache(state, account.id).await?;
    Ok(IssuedToken {
        token,
        from_cache: false,
    })
}

/// Validates a bearer token and returns the account it was issued to.
///
/// Only the signature, expiry and claim shape are checked.
pub fn validate_token(state: &AppState, token: &str) -> Result<i64> {
    let claims = state.tokens.validate(token)?;
    Ok(claims.account_id)
}

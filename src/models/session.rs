use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// The `accountID` name is kept for tokens held by existing clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the account this token was issued to.
    #[serde(rename = "accountID")]
    pub account_id: i64,
    /// Issued at (Unix timestamp). Absent from older tokens.
    #[serde(default)]
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// The account a request was authenticated as.
///
/// Inserted into request extensions by the bearer middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: i64,
}

/// Cache key under which the current token of an account is stored.
pub fn session_cache_key(account_id: i64) -> String {
    format!("token:{}", account_id)
}

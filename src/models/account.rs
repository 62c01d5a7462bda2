use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// Represents a registered account in the system.
#[derive(Clone, Debug)]
pub struct Account {
    /// The unique identifier for the account.
    pub id: i64,
    /// The account's username.
    pub username: String,
    /// The account's email address.
    pub email: String,
    /// The account's Argon2 password hash.
    pub password: String,
    /// The timestamp when the account was created.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Account {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{error::Result, models::account::Account};

/// Durable storage for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account unless the username or email is already taken.
    ///
    /// Returns `None` when a conflicting row exists; nothing is written then.
    async fn insert_if_absent(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>>;

    /// Finds an account by its username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;
}

/// PostgreSQL-backed [`AccountRepository`].
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: Pool,
}

impl PgAccountRepository {
    /// Creates a new `PgAccountRepository`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert_if_absent(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                INSERT INTO accounts (username, password, email)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                RETURNING id, username, email, password, created_at
                "#,
                &[&username, &password_hash, &email],
            )
            .await?;
        Ok(row.as_ref().map(Account::try_from).transpose()?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, username, email, password, created_at
                FROM accounts
                WHERE username = $1
                "#,
                &[&username],
            )
            .await?;
        Ok(row.as_ref().map(Account::try_from).transpose()?)
    }
}

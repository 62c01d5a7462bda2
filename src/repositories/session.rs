use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::{error::Result, models::session::session_cache_key};

/// Fast key-value store holding the token currently issued to each account.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Returns the cached token for `account_id`, if any.
    async fn get_token(&self, account_id: i64) -> Result<Option<String>>;

    /// Caches `token` for `account_id`, expiring after `ttl_secs`.
    async fn store_token(&self, account_id: i64, token: &str, ttl_secs: u64) -> Result<()>;
}

/// Redis-backed [`SessionCache`].
#[derive(Clone)]
pub struct RedisSessionCache {
    redis: ConnectionManager,
}

impl RedisSessionCache {
    /// Creates a new `RedisSessionCache`.
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get_token(&self, account_id: i64) -> Result<Option<String>> {
        let mut redis = self.redis.clone();
        let token: Option<String> = redis.get(session_cache_key(account_id)).await?;
        Ok(token)
    }

    async fn store_token(&self, account_id: i64, token: &str, ttl_secs: u64) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(session_cache_key(account_id), token, ttl_secs)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                e
            })?;
        Ok(())
    }
}

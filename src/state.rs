use redis::aio::ConnectionManager;
use std::sync::Arc;
use crate::config::Config;
use crate::crypto::token::TokenManager;
use crate::error::Result;
use crate::repositories::{
    account::{AccountRepository, PgAccountRepository},
    session::{RedisSessionCache, SessionCache},
    shipment::{PgShipmentRepository, ShipmentRepository},
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// Account storage.
    pub accounts: Arc<dyn AccountRepository>,
    /// Shipment storage.
    pub shipments: Arc<dyn ShipmentRepository>,
    /// Token cache.
    pub sessions: Arc<dyn SessionCache>,
    /// Session token signer.
    pub tokens: TokenManager,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Connects to PostgreSQL and Redis and applies the schema.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url, config.db_pool_max_size)?;
        crate::db::run_migrations(&db).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let mut redis = ConnectionManager::new(redis_client).await?;
        let _: String = redis::cmd("PING").query_async(&mut redis).await?;
        tracing::info!("✅ Redis Connection Manager initialized (pooled)");

        Ok(Self::from_parts(
            config,
            Arc::new(PgAccountRepository::new(db.clone())),
            Arc::new(PgShipmentRepository::new(db)),
            Arc::new(RedisSessionCache::new(redis)),
        ))
    }

    /// Builds an `AppState` around already constructed stores.
    pub fn from_parts(
        config: &Config,
        accounts: Arc<dyn AccountRepository>,
        shipments: Arc<dyn ShipmentRepository>,
        sessions: Arc<dyn SessionCache>,
    ) -> Self {
        AppState {
            accounts,
            shipments,
            sessions,
            tokens: TokenManager::new(&config.jwt_secret, config.token_ttl_hours),
            config: config.clone(),
        }
    }

    /// Session cache TTL in seconds.
    pub fn session_cache_ttl_secs(&self) -> u64 {
        self.config.session_cache_ttl_hours * 3600
    }
}

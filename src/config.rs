use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Minimum accepted length of the token signing secret, in bytes.
const MIN_JWT_SECRET_LEN: usize = 16;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string, either a URL or libpq key/value form.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The HMAC secret used to sign session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// How long an issued token stays valid, in hours.
    pub token_ttl_hours: i64,
    /// How long a token is kept in the session cache, in hours.
    pub session_cache_ttl_hours: u64,
    /// Maximum number of pooled PostgreSQL connections.
    pub db_pool_max_size: usize,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// `DATABASE_URL` wins when set; otherwise a key/value connection string
    /// is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_secret = Zeroizing::new(jwt_secret.into_bytes());

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes");
        }

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => database_url_from_parts()?,
        };

        Ok(Self {
            database_url,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            jwt_secret,
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "72".to_string())
                .parse()
                .context("Invalid TOKEN_TTL_HOURS")?,
            session_cache_ttl_hours: env::var("SESSION_CACHE_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("Invalid SESSION_CACHE_TTL_HOURS")?,
            db_pool_max_size: env::var("DB_POOL_MAX_SIZE")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .context("Invalid DB_POOL_MAX_SIZE")?,
        })
    }
}

fn database_url_from_parts() -> Result<String> {
    let host = env::var("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let user = env::var("DB_USER").context("DB_USER must be set")?;
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let dbname = env::var("DB_NAME").context("DB_NAME must be set")?;

    Ok(conninfo(&host, &port, &user, &password, &dbname))
}

/// Quotes a libpq key/value parameter, escaping `\` and `'`.
fn quote_conninfo_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Builds a libpq key/value connection string. Unlike a URL, no character
/// of the password needs percent-encoding here.
fn conninfo(host: &str, port: &str, user: &str, password: &str, dbname: &str) -> String {
    format!(
        "host={} port={} user={} password={} dbname={}",
        quote_conninfo_value(host),
        quote_conninfo_value(port),
        quote_conninfo_value(user),
        quote_conninfo_value(password),
        quote_conninfo_value(dbname),
    )
}

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::info;

/// Redis connection pool built around the auto-reconnecting
/// `ConnectionManager`. Handles are cheap clones over one multiplexed
/// connection; callers grab a handle per operation.
pub struct RedisPool {
    manager: ConnectionManager,
}

impl RedisPool {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(normalize_redis_url(redis_url).as_str())
            .context("failed to construct Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;
        info!("Redis connection manager initialized");
        Ok(Self { manager })
    }

    pub fn manager(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

/// Accepts bare `host:port` endpoints alongside full URLs.
pub fn normalize_redis_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("redis://") || trimmed.starts_with("rediss://") {
        trimmed.to_string()
    } else {
        format!("redis://{}", trimmed)
    }
}

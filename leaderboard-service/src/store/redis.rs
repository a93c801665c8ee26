//! Redis implementation of [`RankStore`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use super::RankStore;
use crate::error::Result;

/// INCR that wraps back to 1 past the bound, as one atomic step.
static INCR_WRAPPING: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local value = redis.call('INCR', KEYS[1])
        if value > tonumber(ARGV[1]) then
            redis.call('SET', KEYS[1], 1)
            value = 1
        end
        return value
        "#,
    )
});

/// Reads the member's embedded weight fraction (the digits beyond
/// ARGV[4] decimal places), subtracts it from the requested increment
/// and applies the ZINCRBY, all server-side. The floor of the scaled
/// product is corrected against the decimal boundaries k / 10^d, the
/// same way `weight::truncate_score` does it, so a near-boundary
/// weight is never misread as a display digit.
static ZINCR_SWAPPING_FRACTION: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local current = redis.call('ZSCORE', KEYS[1], ARGV[1])
        local embedded = 0
        if current then
            local magnitude = math.abs(tonumber(current))
            local scale = 10 ^ tonumber(ARGV[4])
            local k = math.floor(magnitude * scale)
            if k / scale > magnitude then
                k = k - 1
            elseif (k + 1) / scale <= magnitude then
                k = k + 1
            end
            embedded = magnitude - k / scale
        end
        local delta = tonumber(ARGV[2]) + tonumber(ARGV[3]) - embedded
        return redis.call('ZINCRBY', KEYS[1], delta, ARGV[1])
        "#,
    )
});

pub struct RedisRankStore {
    manager: ConnectionManager,
}

impl RedisRankStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl RankStore for RedisRankStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.manager.clone();
        let value: i64 = conn.incr(key, 1i64).await?;
        Ok(value)
    }

    async fn incr_wrapping(&self, key: &str, bound: i64) -> Result<i64> {
        let mut conn = self.manager.clone();
        let value: i64 = INCR_WRAPPING
            .key(key)
            .arg(bound)
            .invoke_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let mut conn = self.manager.clone();
        let score: Option<f64> = conn.zscore(key, member).await?;
        Ok(score)
    }

    async fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        let mut conn = self.manager.clone();
        let rank: Option<i64> = conn.zrevrank(key, member).await?;
        Ok(rank.map(|r| r as u64))
    }

    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        let mut conn = self.manager.clone();
        let rows: Vec<(String, f64)> = conn.zrevrange_withscores(key, start, stop).await?;
        Ok(rows)
    }

    async fn zincr_swapping_fraction(
        &self,
        key: &str,
        member: &str,
        raw_score: f64,
        weight: f64,
        decimal_places: u32,
    ) -> Result<f64> {
        let mut conn = self.manager.clone();
        let total: f64 = ZINCR_SWAPPING_FRACTION
            .key(key)
            .arg(member)
            .arg(raw_score)
            .arg(weight)
            .arg(decimal_places)
            .invoke_async(&mut conn)
            .await?;
        Ok(total)
    }
}

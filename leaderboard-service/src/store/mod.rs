//! Backing-store abstraction.
//!
//! The ranking layer talks to Redis only through [`RankStore`], which
//! keeps the service logic testable with a mocked store and pins down
//! exactly which primitives the layer relies on: string `GET`/`SET`/
//! `INCR` for the operation counter, sorted-set reads for queries, and
//! two scripted compound operations that must run atomically
//! server-side.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;

mod redis;
pub use self::redis::RedisRankStore;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RankStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomic string increment, returning the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Atomic increment that wraps back to `1` once the result exceeds
    /// `bound`. Runs as one server-side step; an `INCR` followed by a
    /// client-side reset would let another caller observe the
    /// out-of-bounds value.
    async fn incr_wrapping(&self, key: &str, bound: i64) -> Result<i64>;

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// 0-based descending rank, `None` when the member is absent.
    async fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>>;

    /// Descending `(member, score)` pairs for the 0-based inclusive
    /// index range.
    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>>;

    /// Atomically applies `ZINCRBY key (raw_score + weight - embedded)
    /// member`, where `embedded` is the fraction of the member's
    /// current score beyond `decimal_places` decimal digits. Replaces
    /// the previously embedded tie-break weight instead of stacking a
    /// new one on top of it, and closes the read-modify-write gap that
    /// a client-side `ZSCORE` + `ZINCRBY` pair would leave open.
    /// Returns the new composite score.
    async fn zincr_swapping_fraction(
        &self,
        key: &str,
        member: &str,
        raw_score: f64,
        weight: f64,
        decimal_places: u32,
    ) -> Result<f64>;
}

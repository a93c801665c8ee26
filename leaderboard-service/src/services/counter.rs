//! Per-leaderboard operation counter.
//!
//! Bookkeeping follows a deliberately forgiving policy: an empty
//! leaderboard name is a benign no-op returning 0, and a stored value
//! that no longer parses as an integer reads as 0. This is the
//! opposite of the strict validation on ranking-affecting calls, where
//! a silent default would corrupt ordering data.

use std::sync::Arc;

use tracing::warn;

use super::counter_key;
use crate::error::Result;
use crate::store::RankStore;

pub struct OperationCounter {
    store: Arc<dyn RankStore>,
}

impl OperationCounter {
    pub fn new(store: Arc<dyn RankStore>) -> Self {
        Self { store }
    }

    /// Current counter value without advancing it.
    pub async fn peek(&self, leaderboard: &str) -> Result<i64> {
        let Some(key) = counter_key(leaderboard) else {
            return Ok(0);
        };
        let stored = self.store.get(&key).await?;
        Ok(stored
            .and_then(|value| {
                let parsed = value.parse().ok();
                if parsed.is_none() {
                    warn!(key = %key, value = %value, "unparseable counter value, reading as 0");
                }
                parsed
            })
            .unwrap_or(0))
    }

    /// Advances the counter and returns the new value.
    pub async fn offer(&self, leaderboard: &str) -> Result<i64> {
        let Some(key) = counter_key(leaderboard) else {
            return Ok(0);
        };
        self.store.incr(&key).await
    }

    /// Advances the counter, wrapping back to 1 once the result
    /// exceeds `bound`. Bounds the number of decimal digits the
    /// derived weight can occupy on long-lived leaderboards.
    pub async fn offer_circular(&self, leaderboard: &str, bound: i64) -> Result<i64> {
        let Some(key) = counter_key(leaderboard) else {
            return Ok(0);
        };
        self.store.incr_wrapping(&key, bound).await
    }

    /// Unconditional overwrite. Administrative seeding and tests only;
    /// not part of the submission flow.
    pub async fn init(&self, leaderboard: &str, value: i64) -> Result<()> {
        let Some(key) = counter_key(leaderboard) else {
            return Ok(());
        };
        self.store.set(&key, &value.to_string()).await
    }
}

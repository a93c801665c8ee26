//! Leaderboard orchestration.
//!
//! Stateless facade over the backing store: every durable fact lives
//! in Redis, so any number of callers may use one instance
//! concurrently. The single compound mutation (weight correction +
//! increment) is pushed into the store as an atomic script, see
//! [`crate::store::RankStore::zincr_swapping_fraction`].

use std::sync::Arc;

use tracing::{debug, warn};

use super::weight::{compute_weight, precision_budget_ok, truncate_score};
use super::{rank_key, OperationCounter};
use crate::config::RankingConfig;
use crate::error::{AppError, Result};
use crate::store::RankStore;

/// One row of a ranked range listing. `score` is the weight-stripped
/// display value.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub member: String,
    pub score: f64,
}

pub struct LeaderboardService {
    store: Arc<dyn RankStore>,
    counter: OperationCounter,
    decimal_places: u32,
    counter_bound: Option<i64>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn RankStore>, ranking: &RankingConfig) -> Self {
        Self {
            counter: OperationCounter::new(store.clone()),
            store,
            decimal_places: ranking.decimal_places,
            counter_bound: ranking.counter_bound,
        }
    }

    pub fn counter(&self) -> &OperationCounter {
        &self.counter
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Full submission flow: advance the operation counter, derive the
    /// forward tie-break weight and fold it into the member's score.
    /// Forward weight means the most recent submission ranks first
    /// among members with an equal display score.
    pub async fn submit(&self, leaderboard: &str, member: &str, raw_score: f64) -> Result<f64> {
        // Validate before touching the counter so rejected submissions
        // do not burn counter values.
        validate_identifiers(leaderboard, member)?;
        validate_raw_score(raw_score)?;

        let counter_value = match self.counter_bound {
            Some(bound) => self.counter.offer_circular(leaderboard, bound).await?,
            None => self.counter.offer(leaderboard).await?,
        };
        let weight = compute_weight(counter_value, self.decimal_places);
        if !precision_budget_ok(raw_score, weight) {
            // Documented caller contract, not an enforced invariant.
            warn!(
                leaderboard = %leaderboard,
                member = %member,
                counter_value,
                "raw score and weight digits exceed the f64 precision budget, ties may reappear"
            );
        }
        self.join_rank(leaderboard, member, raw_score, weight.value())
            .await
    }

    /// Folds `raw_score + weight` into the member's composite score,
    /// replacing the previously embedded weight so repeated updates
    /// never accumulate tie-break fractions. Returns the resulting
    /// display-precision score.
    pub async fn join_rank(
        &self,
        leaderboard: &str,
        member: &str,
        raw_score: f64,
        weight: f64,
    ) -> Result<f64> {
        validate_identifiers(leaderboard, member)?;
        validate_raw_score(raw_score)?;
        if !(weight > -1.0 && weight < 1.0) {
            return Err(AppError::InvalidArgument(format!(
                "weight must lie in (-1, 1), got {weight}"
            )));
        }

        let Some(key) = rank_key(leaderboard) else {
            return Err(AppError::InvalidArgument(
                "leaderboard name must not be empty".to_string(),
            ));
        };
        let total = self
            .store
            .zincr_swapping_fraction(&key, member, raw_score, weight, self.decimal_places)
            .await?;
        debug!(
            leaderboard = %leaderboard,
            member = %member,
            raw_score,
            weight,
            total,
            "score joined"
        );
        Ok(truncate_score(total, self.decimal_places))
    }

    /// Display-precision score, `None` when the member or leaderboard
    /// is absent. Absence is never reported as a zero score.
    pub async fn rank_score(&self, leaderboard: &str, member: &str) -> Result<Option<f64>> {
        let Some(key) = rank_key(leaderboard) else {
            return Ok(None);
        };
        if member.is_empty() {
            return Ok(None);
        }
        let score = self.store.zscore(&key, member).await?;
        Ok(score.map(|s| truncate_score(s, self.decimal_places)))
    }

    /// 1-based descending rank, `None` when absent.
    pub async fn rank_number(&self, leaderboard: &str, member: &str) -> Result<Option<u64>> {
        let Some(key) = rank_key(leaderboard) else {
            return Ok(None);
        };
        if member.is_empty() {
            return Ok(None);
        }
        let rank = self.store.zrevrank(&key, member).await?;
        Ok(rank.map(|r| r + 1))
    }

    /// Ranked listing for the 1-based inclusive range `[start, end]`,
    /// descending by composite score. An unknown leaderboard yields an
    /// empty listing, matching "no entries" semantics.
    pub async fn rank_range(
        &self,
        leaderboard: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<RankEntry>> {
        if start < 1 || end < start {
            return Err(AppError::InvalidArgument(format!(
                "rank range must satisfy 1 <= start <= end, got [{start}, {end}]"
            )));
        }
        // A straight cast would wrap offsets past isize::MAX into
        // negative tail indexes.
        let (Ok(start_index), Ok(stop_index)) =
            (isize::try_from(start - 1), isize::try_from(end - 1))
        else {
            return Err(AppError::InvalidArgument(format!(
                "rank range exceeds the addressable index space: [{start}, {end}]"
            )));
        };
        let Some(key) = rank_key(leaderboard) else {
            return Ok(Vec::new());
        };
        let rows = self
            .store
            .zrevrange_withscores(&key, start_index, stop_index)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(member, score)| RankEntry {
                member,
                score: truncate_score(score, self.decimal_places),
            })
            .collect())
    }
}

fn validate_identifiers(leaderboard: &str, member: &str) -> Result<()> {
    if leaderboard.is_empty() {
        return Err(AppError::InvalidArgument(
            "leaderboard name must not be empty".to_string(),
        ));
    }
    if member.is_empty() {
        return Err(AppError::InvalidArgument(
            "member id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_raw_score(raw_score: f64) -> Result<()> {
    if !raw_score.is_finite() {
        return Err(AppError::InvalidArgument(format!(
            "raw score must be finite, got {raw_score}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockRankStore;

    fn service(store: MockRankStore) -> LeaderboardService {
        LeaderboardService::new(
            Arc::new(store),
            &RankingConfig {
                decimal_places: 2,
                counter_bound: None,
            },
        )
    }

    #[tokio::test]
    async fn join_rank_rejects_empty_identifiers() {
        let svc = service(MockRankStore::new());
        assert!(matches!(
            svc.join_rank("", "jin", 100.0, 0.0).await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.join_rank("board", "", 100.0, 0.0).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn join_rank_rejects_out_of_range_weights() {
        let svc = service(MockRankStore::new());
        for weight in [1.0, -1.0, 2.5, f64::NAN] {
            assert!(matches!(
                svc.join_rank("board", "jin", 100.0, weight).await,
                Err(AppError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            svc.join_rank("board", "jin", f64::INFINITY, 0.0).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn join_rank_swaps_weight_through_the_store() {
        let mut store = MockRankStore::new();
        store
            .expect_zincr_swapping_fraction()
            .withf(|key, member, raw, weight, dp| {
                key == "rank:board"
                    && member == "jin_1"
                    && *raw == 100.0
                    && *weight == 0.001
                    && *dp == 2
            })
            .returning(|_, _, _, _, _| Ok(100.001));
        let svc = service(store);
        let score = svc.join_rank("board", "jin_1", 100.0, 0.001).await.unwrap();
        assert_eq!(score, 100.00);
    }

    #[tokio::test]
    async fn zero_weight_is_valid() {
        let mut store = MockRankStore::new();
        store
            .expect_zincr_swapping_fraction()
            .returning(|_, _, raw, _, _| Ok(raw));
        let svc = service(store);
        assert_eq!(svc.join_rank("board", "jin", 50.0, 0.0).await.unwrap(), 50.0);
    }

    #[tokio::test]
    async fn submit_offers_the_counter_and_derives_the_weight() {
        let mut store = MockRankStore::new();
        store
            .expect_incr()
            .withf(|key| key == "rank:board:operationCount")
            .returning(|_| Ok(3));
        store
            .expect_zincr_swapping_fraction()
            .withf(|key, member, raw, weight, dp| {
                // counter 3 with D=2 -> 3 / 10^3
                key == "rank:board"
                    && member == "jin_3"
                    && *raw == 100.0
                    && *weight == 0.003
                    && *dp == 2
            })
            .returning(|_, _, raw, weight, _| Ok(raw + weight));
        let svc = service(store);
        let score = svc.submit("board", "jin_3", 100.0).await.unwrap();
        assert_eq!(score, 100.00);
    }

    #[tokio::test]
    async fn submit_uses_the_circular_counter_when_bounded() {
        let mut store = MockRankStore::new();
        store
            .expect_incr_wrapping()
            .withf(|key, bound| key == "rank:board:operationCount" && *bound == 9999)
            .returning(|_, _| Ok(1));
        store
            .expect_zincr_swapping_fraction()
            .returning(|_, _, raw, weight, _| Ok(raw + weight));
        let svc = LeaderboardService::new(
            Arc::new(store),
            &RankingConfig {
                decimal_places: 2,
                counter_bound: Some(9999),
            },
        );
        assert_eq!(svc.submit("board", "jin", 10.0).await.unwrap(), 10.0);
    }

    #[tokio::test]
    async fn submit_rejects_before_burning_a_counter_value() {
        // No expectations: an offer would panic the mock.
        let svc = service(MockRankStore::new());
        assert!(svc.submit("board", "", 100.0).await.is_err());
        assert!(svc.submit("", "jin", 100.0).await.is_err());
    }

    #[tokio::test]
    async fn rank_score_distinguishes_absent_from_zero() {
        let mut store = MockRankStore::new();
        store.expect_zscore().returning(|_, _| Ok(None));
        let svc = service(store);
        assert_eq!(svc.rank_score("board", "ghost").await.unwrap(), None);

        let mut store = MockRankStore::new();
        store.expect_zscore().returning(|_, _| Ok(Some(0.0)));
        let svc = service(store);
        assert_eq!(svc.rank_score("board", "jin").await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn rank_score_strips_the_embedded_weight() {
        let mut store = MockRankStore::new();
        store
            .expect_zscore()
            .withf(|key, member| key == "rank:board" && member == "jin_1")
            .returning(|_, _| Ok(Some(100.0001)));
        let svc = service(store);
        assert_eq!(
            svc.rank_score("board", "jin_1").await.unwrap(),
            Some(100.00)
        );
    }

    #[tokio::test]
    async fn rank_number_is_one_based() {
        let mut store = MockRankStore::new();
        store.expect_zrevrank().returning(|_, _| Ok(Some(0)));
        let svc = service(store);
        assert_eq!(svc.rank_number("board", "top").await.unwrap(), Some(1));

        let mut store = MockRankStore::new();
        store.expect_zrevrank().returning(|_, _| Ok(None));
        let svc = service(store);
        assert_eq!(svc.rank_number("board", "ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_names_read_as_absent() {
        let svc = service(MockRankStore::new());
        assert_eq!(svc.rank_score("", "jin").await.unwrap(), None);
        assert_eq!(svc.rank_number("board", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rank_range_translates_to_zero_based_indexes() {
        let mut store = MockRankStore::new();
        store
            .expect_zrevrange_withscores()
            .withf(|key, start, stop| key == "rank:board" && *start == 0 && *stop == 9)
            .returning(|_, _, _| {
                Ok(vec![
                    ("jin_3".to_string(), 100.000003),
                    ("jin_2".to_string(), 100.000002),
                    ("jin_1".to_string(), 100.000001),
                ])
            });
        let svc = service(store);
        let entries = svc.rank_range("board", 1, 10).await.unwrap();
        let members: Vec<&str> = entries.iter().map(|e| e.member.as_str()).collect();
        assert_eq!(members, vec!["jin_3", "jin_2", "jin_1"]);
        assert!(entries.iter().all(|e| e.score == 100.00));
    }

    #[tokio::test]
    async fn rank_range_on_unknown_board_is_empty_not_an_error() {
        let mut store = MockRankStore::new();
        store
            .expect_zrevrange_withscores()
            .returning(|_, _, _| Ok(Vec::new()));
        let svc = service(store);
        assert!(svc.rank_range("no-such-board", 1, 10).await.unwrap().is_empty());
        // Empty name follows range semantics, not validation semantics.
        assert!(svc.rank_range("", 1, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rank_range_rejects_inverted_bounds() {
        let svc = service(MockRankStore::new());
        assert!(matches!(
            svc.rank_range("board", 0, 10).await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.rank_range("board", 5, 4).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn rank_range_rejects_indexes_beyond_addressable_space() {
        // No store expectations: offsets past isize::MAX must be
        // refused before any query, not wrapped into tail indexes.
        let svc = service(MockRankStore::new());
        let start = isize::MAX as u64 + 2;
        assert!(matches!(
            svc.rank_range("board", start, start + 4).await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            svc.rank_range("board", 1, u64::MAX).await,
            Err(AppError::InvalidArgument(_))
        ));
    }
}

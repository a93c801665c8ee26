pub mod counter;
pub mod leaderboard;
pub mod weight;

pub use counter::OperationCounter;
pub use leaderboard::{LeaderboardService, RankEntry};
pub use weight::{compute_reverse_weight, compute_weight, Weight, DEFAULT_DECIMAL_PLACES};

/// Key namespace shared by the sorted set and its bookkeeping keys.
pub const KEY_RANK_PREFIX: &str = "rank:";

/// Sorted-set key for a leaderboard, `None` for an empty name.
pub fn rank_key(leaderboard: &str) -> Option<String> {
    if leaderboard.is_empty() {
        return None;
    }
    Some(format!("{KEY_RANK_PREFIX}{leaderboard}"))
}

/// String key holding the leaderboard's operation counter.
pub fn counter_key(leaderboard: &str) -> Option<String> {
    if leaderboard.is_empty() {
        return None;
    }
    Some(format!("{KEY_RANK_PREFIX}{leaderboard}:operationCount"))
}

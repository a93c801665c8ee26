//! Leaderboard Service
//!
//! Ranking layer over Redis sorted sets. Equal display scores are kept
//! totally ordered by folding a fractional weight, derived from a
//! per-leaderboard operation counter, into the stored composite score.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{LeaderboardService, OperationCounter};
pub use store::{RankStore, RedisRankStore};

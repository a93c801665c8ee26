//! HTTP request/response models.
//!
//! Scores cross the wire as display-precision strings (`"100.00"`) so
//! clients never see the embedded tie-break digits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub member: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub board: String,
    pub member: String,
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct MemberScoreResponse {
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct MemberRankResponse {
    pub rank: u64,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default = "default_range_start")]
    pub start: u64,
    #[serde(default = "default_range_end")]
    pub end: u64,
}

fn default_range_start() -> u64 {
    1
}

fn default_range_end() -> u64 {
    10
}

#[derive(Debug, Serialize)]
pub struct RangeEntry {
    pub member: String,
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    pub entries: Vec<RangeEntry>,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct CounterInitRequest {
    pub value: i64,
}

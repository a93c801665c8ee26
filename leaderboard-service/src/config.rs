//! Configuration management.
//!
//! Loaded from environment variables with sensible defaults; a `.env`
//! file is honored in development.

use serde::Deserialize;
use std::env;

use crate::error::{AppError, Result};
use crate::services::weight::{DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub redis: RedisConfig,
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// Decimal places reserved for the displayed score; weight digits
    /// start beyond them.
    pub decimal_places: u32,
    /// When set, submissions advance the counter in circular mode,
    /// wrapping past this bound.
    pub counter_bound: Option<i64>,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        dotenvy::dotenv().ok();

        let decimal_places = parse_var("SCORE_DECIMAL_PLACES", DEFAULT_DECIMAL_PLACES)?;
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(AppError::Internal(format!(
                "SCORE_DECIMAL_PLACES must be at most {MAX_DECIMAL_PLACES}, got {decimal_places}"
            )));
        }

        Ok(Config {
            app: AppConfig {
                host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("APP_PORT", 8014)?,
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "leaderboard-service".to_string()),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            ranking: RankingConfig {
                decimal_places,
                counter_bound: match env::var("COUNTER_BOUND") {
                    Ok(raw) => Some(raw.parse().map_err(|_| {
                        AppError::Internal(format!(
                            "COUNTER_BOUND must be a valid i64, got {raw:?}"
                        ))
                    })?),
                    Err(_) => None,
                },
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Internal(format!("{name} has an invalid value: {raw:?}"))),
        Err(_) => Ok(default),
    }
}

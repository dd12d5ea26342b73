//! Core runtime configuration.
//!
//! # Responsibility
//! - Hold logging/storage settings resolved at process start.
//! - Hold every numeric weight used by scoring and ranking.
//!
//! # Invariants
//! - `CoreConfig::from_env` never fails; malformed overrides fall back to
//!   defaults.
//! - Default weights reproduce the app's published scoring formulas.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "KINDL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "KINDL_LOG_DIR";
pub const ENV_DB_PATH: &str = "KINDL_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "kindl_behavior.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "kindl-logs";

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Weights of the per-intent behavior score.
///
/// `score = view·count + min(time_ms/1000, time_cap) + depth·scroll_depth
///        + feels_right·n − not_vibe·n + maybe_later·n
///        + max(0, recency_max − age_days·recency_decay_per_day)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub view: f64,
    /// Upper bound on the seconds-spent term.
    pub time_cap: f64,
    pub scroll_depth: f64,
    pub feels_right: f64,
    /// Subtracted per `not-vibe` reaction.
    pub not_vibe: f64,
    pub maybe_later: f64,
    pub recency_max: f64,
    pub recency_decay_per_day: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            view: 10.0,
            time_cap: 50.0,
            scroll_depth: 5.0,
            feels_right: 20.0,
            not_vibe: 10.0,
            maybe_later: 5.0,
            recency_max: 30.0,
            recency_decay_per_day: 30.0,
        }
    }
}

/// Weights used by recommendation and blending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendWeights {
    /// Per matching user tag in `recommend`.
    pub tag_match: f64,
    /// Extra boost per `feels-right` reaction in `recommend`.
    pub feels_right_boost: f64,
    /// Per matching user tag in `blend`.
    pub blend_tag_match: f64,
    /// Minimum matching tags for an intent to qualify as a blend.
    pub blend_min_matches: usize,
    /// Maximum number of blended intents returned.
    pub blend_limit: usize,
}

impl Default for RecommendWeights {
    fn default() -> Self {
        Self {
            tag_match: 15.0,
            feels_right_boost: 10.0,
            blend_tag_match: 20.0,
            blend_min_matches: 2,
            blend_limit: 2,
        }
    }
}

/// Process-level configuration for core callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// SQLite file holding persisted behavior counters.
    pub db_path: PathBuf,
    pub score: ScoreWeights,
    pub recommend: RecommendWeights,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp_dir = std::env::temp_dir();
        Self {
            log_level: default_log_level().to_string(),
            log_dir: temp_dir.join(DEFAULT_LOG_DIR_NAME),
            db_path: temp_dir.join(DEFAULT_DB_FILE_NAME),
            score: ScoreWeights::default(),
            recommend: RecommendWeights::default(),
        }
    }
}

impl CoreConfig {
    /// Builds config from defaults plus `KINDL_*` environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        self
    }
}

//! Core personalization logic for Kindl.
//! This crate is the single source of truth for behavior-scoring invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod personalization;
pub mod service;
pub mod store;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CoreConfig, RecommendWeights, ScoreWeights};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::behavior::{
    BehaviorSnapshot, IntentViewEntry, IntentViewRecord, InvalidSnapshot, ProfileViewRecord,
    ReactionKind, ReactionTally, UnknownReactionKind,
};
pub use model::intent::{default_intents, find_intent, Intent, IntentId, ProfileId};
pub use personalization::{
    current_hour, time_based_background, time_based_copy, PersonalizationEngine,
};
pub use service::session::{BehaviorSession, FeedPresentation, SessionError, SessionResult};
pub use store::{
    BehaviorStore, JsonFileBehaviorStore, MemoryBehaviorStore, SqliteBehaviorStore, StoreError,
    StoreResult,
};
pub use tracker::{BehaviorTracker, TrackerError, TrackerResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

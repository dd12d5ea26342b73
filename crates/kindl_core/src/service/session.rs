//! Behavior session use-case service.
//!
//! # Responsibility
//! - Compose tracker, engine and store into one app-lifetime object.
//! - Persist counters after every tracking call.
//! - Build the discovery feed presentation in one read.
//!
//! # Invariants
//! - Tracking calls never fail because of storage; save failures are
//!   logged and retried implicitly by the next write or `flush`.
//! - Input errors are reported before any state changes.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::model::behavior::ReactionKind;
use crate::model::intent::{find_intent, Intent, IntentId};
use crate::personalization::engine::DEFAULT_RECOMMEND_LIMIT;
use crate::personalization::{time_based_background, time_based_copy, PersonalizationEngine};
use crate::store::{BehaviorStore, StoreError};
use crate::tracker::{BehaviorTracker, TrackerError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of recently viewed intents shown above the feed.
pub const DEFAULT_RECENT_LIMIT: usize = 2;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    Tracker(TrackerError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tracker(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tracker(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TrackerError> for SessionError {
    fn from(value: TrackerError) -> Self {
        Self::Tracker(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Everything the discovery feed renders from behavior state.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPresentation {
    /// Full feed, highest behavior score first.
    pub ordered: Vec<Intent>,
    pub recently_viewed: Vec<Intent>,
    pub recommended: Vec<Intent>,
    pub blended: Vec<Intent>,
    pub header_copy: &'static str,
    pub background: &'static str,
}

/// App-lifetime owner of behavior counters and their store.
pub struct BehaviorSession<S: BehaviorStore, C: Clock = SystemClock> {
    tracker: BehaviorTracker<C>,
    engine: PersonalizationEngine,
    store: S,
}

impl<S: BehaviorStore, C: Clock> BehaviorSession<S, C> {
    /// Starts an empty session without reading `store`.
    ///
    /// The first tracking call overwrites whatever `store` held.
    pub fn new(store: S, clock: C, config: &CoreConfig) -> Self {
        Self {
            tracker: BehaviorTracker::with_weights(clock, config.score),
            engine: PersonalizationEngine::new(config.recommend),
            store,
        }
    }

    /// Starts a session, restoring counters previously saved in `store`.
    ///
    /// # Errors
    /// - Returns store errors from `load`; a corrupt store is not silently
    ///   discarded.
    pub fn open(store: S, clock: C, config: &CoreConfig) -> SessionResult<Self> {
        let restored = store.load()?;
        let mut session = Self::new(store, clock, config);
        let restored_intents = restored
            .as_ref()
            .map_or(0, |snapshot| snapshot.intent_views.len());
        if let Some(snapshot) = restored {
            session.tracker.restore(snapshot);
        }
        info!(
            "event=session_open module=service status=ok store={} restored_intents={}",
            session.store.kind(),
            restored_intents
        );

        Ok(session)
    }

    pub fn tracker(&self) -> &BehaviorTracker<C> {
        &self.tracker
    }

    pub fn engine(&self) -> &PersonalizationEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn track_view(&mut self, intent_id: &str) {
        self.tracker.track_view(intent_id);
        self.persist();
    }

    pub fn track_time_spent(&mut self, intent_id: &str, duration_ms: i64) {
        self.tracker.track_time_spent(intent_id, duration_ms);
        self.persist();
    }

    pub fn track_scroll_depth(&mut self, intent_id: &str, depth: f64) -> SessionResult<()> {
        self.tracker.track_scroll_depth(intent_id, depth)?;
        self.persist();
        Ok(())
    }

    pub fn track_reaction(&mut self, intent_id: &str, kind: ReactionKind) {
        self.tracker.track_reaction(intent_id, kind);
        self.persist();
    }

    pub fn track_reaction_str(&mut self, intent_id: &str, reaction: &str) -> SessionResult<()> {
        self.tracker.track_reaction_str(intent_id, reaction)?;
        self.persist();
        Ok(())
    }

    pub fn track_profile_view(&mut self, profile_id: &str, time_spent_ms: i64) {
        self.tracker.track_profile_view(profile_id, time_spent_ms);
        self.persist();
    }

    pub fn recently_viewed(&self, limit: usize) -> Vec<IntentId> {
        self.tracker.recently_viewed(limit)
    }

    pub fn ordered_intents(&self, intents: &[Intent]) -> Vec<Intent> {
        self.tracker.ordered_intents(intents)
    }

    pub fn recommend<T: AsRef<str>>(
        &self,
        intents: &[Intent],
        user_tags: &[T],
        limit: usize,
    ) -> Vec<Intent> {
        self.engine
            .recommend(&self.tracker, intents, user_tags, limit)
    }

    pub fn blend<T: AsRef<str>>(&self, user_tags: &[T], intents: &[Intent]) -> Vec<Intent> {
        self.engine.blend(&self.tracker, user_tags, intents)
    }

    pub fn ambient_vibes(&self, title: &str) -> Vec<&'static str> {
        self.engine.ambient_vibes(title)
    }

    /// Builds the discovery feed for `intents` at local `hour`.
    ///
    /// Recently viewed ids that are not part of `intents` are dropped.
    pub fn feed<T: AsRef<str>>(
        &self,
        intents: &[Intent],
        user_tags: &[T],
        hour: u32,
    ) -> FeedPresentation {
        let recently_viewed = self
            .tracker
            .recently_viewed(DEFAULT_RECENT_LIMIT)
            .iter()
            .filter_map(|id| find_intent(intents, id).cloned())
            .collect();

        FeedPresentation {
            ordered: self.ordered_intents(intents),
            recently_viewed,
            recommended: self.recommend(intents, user_tags, DEFAULT_RECOMMEND_LIMIT),
            blended: self.blend(user_tags, intents),
            header_copy: time_based_copy(hour),
            background: time_based_background(hour),
        }
    }

    /// Persists current counters, surfacing storage errors.
    pub fn flush(&mut self) -> SessionResult<()> {
        self.store.save(&self.tracker.snapshot())?;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.tracker.snapshot()) {
            error!(
                "event=behavior_persist module=service status=error store={} error={}",
                self.store.kind(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BehaviorSession, SessionError};
    use crate::clock::ManualClock;
    use crate::config::CoreConfig;
    use crate::model::behavior::BehaviorSnapshot;
    use crate::model::intent::default_intents;
    use crate::store::{BehaviorStore, MemoryBehaviorStore, StoreError, StoreResult};

    struct FailingStore;

    impl BehaviorStore for FailingStore {
        fn kind(&self) -> &'static str {
            "failing"
        }

        fn load(&self) -> StoreResult<Option<BehaviorSnapshot>> {
            Ok(None)
        }

        fn save(&mut self, _snapshot: &BehaviorSnapshot) -> StoreResult<()> {
            Err(StoreError::InvalidData("disk full".to_string()))
        }
    }

    #[test]
    fn tracking_persists_each_write() {
        let config = CoreConfig::default();
        let mut session =
            BehaviorSession::open(MemoryBehaviorStore::new(), ManualClock::new(0), &config)
                .unwrap();
        session.track_view("2");

        let saved = session.store().load().unwrap().expect("snapshot saved");
        assert_eq!(saved.intent_views[0].intent_id, "2");
        assert_eq!(saved.intent_views[0].record.count, 1);
    }

    #[test]
    fn save_failures_do_not_fail_tracking_but_flush_reports_them() {
        let config = CoreConfig::default();
        let mut session =
            BehaviorSession::open(FailingStore, ManualClock::new(0), &config).unwrap();

        session.track_view("1");
        assert_eq!(session.tracker().view_record("1").unwrap().count, 1);

        let err = session.flush().unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
    }

    #[test]
    fn invalid_reaction_does_not_persist() {
        let config = CoreConfig::default();
        let mut session =
            BehaviorSession::open(MemoryBehaviorStore::new(), ManualClock::new(0), &config)
                .unwrap();

        let err = session.track_reaction_str("1", "meh").unwrap_err();
        assert!(matches!(err, SessionError::Tracker(_)));
        assert!(session.store().load().unwrap().is_none());
    }

    #[test]
    fn feed_drops_recent_ids_outside_catalog() {
        let config = CoreConfig::default();
        let clock = ManualClock::new(0);
        let mut session =
            BehaviorSession::open(MemoryBehaviorStore::new(), clock.clone(), &config).unwrap();
        session.track_view("retired-intent");
        clock.advance(1);
        session.track_view("5");

        let feed = session.feed(&default_intents(), &["cozy", "social"], 9);
        assert_eq!(feed.recently_viewed.len(), 1);
        assert_eq!(feed.recently_viewed[0].id, "5");
        assert_eq!(feed.ordered[0].id, "5");
        assert_eq!(feed.blended.len(), 1);
        assert_eq!(feed.blended[0].title, "Food & Coffee Dates");
        assert_eq!(feed.header_copy, crate::personalization::time_of_day::MORNING_COPY);
    }
}

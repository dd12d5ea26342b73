//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose behavior tracking and personalization to Dart via FRB.
//! - Own the single process-wide behavior session.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All session access is serialized through one mutex.
//! - Error-returning calls yield an empty string on success.

use kindl_core::{
    core_version as core_version_inner, current_hour, init_logging as init_logging_inner,
    ping as ping_inner, time_based_background as time_based_background_inner,
    time_based_copy as time_based_copy_inner, BehaviorSession, BehaviorStore, CoreConfig,
    Intent, MemoryBehaviorStore, SqliteBehaviorStore, SystemClock,
};
use log::{error, warn};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

const RECENT_DEFAULT_LIMIT: u32 = 2;
const RECOMMEND_DEFAULT_LIMIT: u32 = 3;
const LIMIT_MAX: u32 = 20;

type SharedStore = Box<dyn BehaviorStore + Send>;
type FfiSession = BehaviorSession<SharedStore, SystemClock>;

static SESSION: OnceLock<Mutex<FfiSession>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Intent category as exchanged with Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentItem {
    /// Stable intent id used for behavior counters.
    pub id: String,
    /// Display title used for tag lookups.
    pub title: String,
}

/// Discovery feed response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentFeedResponse {
    pub ordered: Vec<IntentItem>,
    pub recently_viewed: Vec<IntentItem>,
    pub recommended: Vec<IntentItem>,
    pub blended: Vec<IntentItem>,
    pub header_copy: String,
    pub background: String,
}

/// Records that the user opened a card in `intent_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn track_intent_view(intent_id: String) {
    with_session(|session| session.track_view(intent_id.trim()));
}

/// Adds dwell time in milliseconds. Negative values are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn track_intent_time_spent(intent_id: String, time_spent_ms: i64) {
    with_session(|session| session.track_time_spent(intent_id.trim(), time_spent_ms));
}

/// Raises the observed scroll depth.
///
/// # FFI contract
/// - Returns empty string on success, error message for NaN/infinite input.
#[flutter_rust_bridge::frb(sync)]
pub fn track_scroll_depth(intent_id: String, depth: f64) -> String {
    with_session(
        |session| match session.track_scroll_depth(intent_id.trim(), depth) {
            Ok(()) => String::new(),
            Err(err) => format!("track_scroll_depth failed: {err}"),
        },
    )
}

/// Records a micro-reaction (`feels-right|maybe-later|not-vibe`).
///
/// # FFI contract
/// - Returns empty string on success, error message for unknown reactions.
#[flutter_rust_bridge::frb(sync)]
pub fn track_reaction(intent_id: String, reaction_id: String) -> String {
    with_session(
        |session| match session.track_reaction_str(intent_id.trim(), &reaction_id) {
            Ok(()) => String::new(),
            Err(err) => format!("track_reaction failed: {err}"),
        },
    )
}

/// Records one profile card open with its dwell time.
#[flutter_rust_bridge::frb(sync)]
pub fn track_profile_view(profile_id: String, time_spent_ms: i64) {
    with_session(|session| session.track_profile_view(profile_id.trim(), time_spent_ms));
}

/// Returns recently viewed intent ids, most recent first (default 2).
#[flutter_rust_bridge::frb(sync)]
pub fn recently_viewed_intents(limit: Option<u32>) -> Vec<String> {
    let limit = normalize_limit(limit, RECENT_DEFAULT_LIMIT);
    with_session(|session| session.recently_viewed(limit as usize))
}

/// Orders intent ids by behavior score, keeping input order on ties.
#[flutter_rust_bridge::frb(sync)]
pub fn ordered_intent_ids(intent_ids: Vec<String>) -> Vec<String> {
    with_session(|session| session.tracker().ordered_by_score(&intent_ids))
}

/// Returns the top intents for the user's declared vibe tags (default 3).
#[flutter_rust_bridge::frb(sync)]
pub fn recommended_intents(
    intents: Vec<IntentItem>,
    user_vibe_tags: Vec<String>,
    limit: Option<u32>,
) -> Vec<IntentItem> {
    let limit = normalize_limit(limit, RECOMMEND_DEFAULT_LIMIT);
    let intents = to_core_intents(intents);
    let picked =
        with_session(|session| session.recommend(&intents, &user_vibe_tags, limit as usize));
    to_items(picked)
}

/// Returns up to two intents matching at least two vibe tags.
#[flutter_rust_bridge::frb(sync)]
pub fn blended_recommendations(
    user_vibe_tags: Vec<String>,
    intents: Vec<IntentItem>,
) -> Vec<IntentItem> {
    let intents = to_core_intents(intents);
    let blended = with_session(|session| session.blend(&user_vibe_tags, &intents));
    to_items(blended)
}

/// Returns 3-4 randomized ambient labels for an intent title.
#[flutter_rust_bridge::frb(sync)]
pub fn ambient_vibes(intent_title: String) -> Vec<String> {
    with_session(|session| {
        session
            .ambient_vibes(intent_title.trim())
            .into_iter()
            .map(str::to_owned)
            .collect()
    })
}

/// Returns feed micro-copy for `hour` (device local hour when `None`).
#[flutter_rust_bridge::frb(sync)]
pub fn time_based_copy(hour: Option<u32>) -> String {
    time_based_copy_inner(hour.unwrap_or_else(current_hour)).to_owned()
}

/// Returns the feed background color token for `hour`.
#[flutter_rust_bridge::frb(sync)]
pub fn time_based_background(hour: Option<u32>) -> String {
    time_based_background_inner(hour.unwrap_or_else(current_hour)).to_owned()
}

/// Builds the full discovery feed in one call.
#[flutter_rust_bridge::frb(sync)]
pub fn intent_feed(
    intents: Vec<IntentItem>,
    user_vibe_tags: Vec<String>,
    hour: Option<u32>,
) -> IntentFeedResponse {
    let intents = to_core_intents(intents);
    let hour = hour.unwrap_or_else(current_hour);
    let feed = with_session(|session| session.feed(&intents, &user_vibe_tags, hour));
    IntentFeedResponse {
        ordered: to_items(feed.ordered),
        recently_viewed: to_items(feed.recently_viewed),
        recommended: to_items(feed.recommended),
        blended: to_items(feed.blended),
        header_copy: feed.header_copy.to_owned(),
        background: feed.background.to_owned(),
    }
}

/// Persists behavior counters now.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn flush_behavior() -> String {
    with_session(|session| match session.flush() {
        Ok(()) => String::new(),
        Err(err) => format!("flush_behavior failed: {err}"),
    })
}

fn normalize_limit(limit: Option<u32>, default: u32) -> u32 {
    match limit {
        Some(value) if value > LIMIT_MAX => LIMIT_MAX,
        Some(value) => value,
        None => default,
    }
}

fn with_session<T>(f: impl FnOnce(&mut FfiSession) -> T) -> T {
    let mut guard = lock_session();
    f(&mut guard)
}

fn lock_session() -> MutexGuard<'static, FfiSession> {
    SESSION
        .get_or_init(|| Mutex::new(open_session(&CoreConfig::from_env())))
        .lock()
        // Counters stay valid per field after a panicked call.
        .unwrap_or_else(PoisonError::into_inner)
}

fn open_session(config: &CoreConfig) -> FfiSession {
    let durable = SqliteBehaviorStore::open(&config.db_path)
        .map_err(|err| err.to_string())
        .and_then(|store| {
            BehaviorSession::open(Box::new(store) as SharedStore, SystemClock, config)
                .map_err(|err| err.to_string())
        });

    match durable {
        Ok(session) => session,
        Err(err) => {
            error!(
                "event=session_open module=ffi status=error store=sqlite error={}",
                err
            );
            warn!("event=session_open module=ffi status=fallback store=memory");
            memory_session(config)
        }
    }
}

fn memory_session(config: &CoreConfig) -> FfiSession {
    let store: SharedStore = Box::new(MemoryBehaviorStore::new());
    BehaviorSession::new(store, SystemClock, config)
}

fn to_core_intents(items: Vec<IntentItem>) -> Vec<Intent> {
    items
        .into_iter()
        .map(|item| Intent::new(item.id.trim(), item.title.trim()))
        .collect()
}

fn to_items(intents: Vec<Intent>) -> Vec<IntentItem> {
    intents
        .into_iter()
        .map(|intent| IntentItem {
            id: intent.id,
            title: intent.title,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        ambient_vibes, blended_recommendations, core_version, init_logging, intent_feed,
        ordered_intent_ids, ping, recently_viewed_intents, recommended_intents,
        time_based_background, time_based_copy, track_intent_time_spent, track_intent_view,
        track_reaction, track_scroll_depth, IntentItem,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/kindl".to_string()).is_empty());
    }

    #[test]
    fn track_reaction_reports_unknown_kind() {
        let intent = unique_token("reaction");
        assert!(track_reaction(intent.clone(), "feels-right".to_string()).is_empty());
        let message = track_reaction(intent, "super-like".to_string());
        assert!(message.contains("super-like"), "{message}");
    }

    #[test]
    fn track_scroll_depth_reports_nan() {
        let intent = unique_token("depth");
        assert!(track_scroll_depth(intent.clone(), 0.4).is_empty());
        assert!(!track_scroll_depth(intent, f64::NAN).is_empty());
    }

    #[test]
    fn ordered_intent_ids_puts_engaged_intent_first() {
        let cold = unique_token("cold");
        let hot = unique_token("hot");
        track_intent_view(hot.clone());
        track_intent_time_spent(hot.clone(), 4_000);

        let ordered = ordered_intent_ids(vec![cold.clone(), hot.clone()]);
        assert_eq!(ordered, vec![hot.clone(), cold]);
        assert!(recently_viewed_intents(Some(20)).contains(&hot));
    }

    #[test]
    fn recommendations_and_blends_use_titles() {
        let intents = vec![
            IntentItem {
                id: unique_token("calm"),
                title: "Spiritual & Calm".to_string(),
            },
            IntentItem {
                id: unique_token("coffee"),
                title: "Food & Coffee Dates".to_string(),
            },
        ];
        let tags = vec!["cozy".to_string(), "relaxed".to_string()];

        let recommended = recommended_intents(intents.clone(), tags.clone(), Some(1));
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].title, "Food & Coffee Dates");

        let blended = blended_recommendations(tags, intents);
        assert_eq!(blended.len(), 1);
        assert_eq!(blended[0].title, "Food & Coffee Dates");
    }

    #[test]
    fn feed_and_time_hints_use_explicit_hour() {
        assert_eq!(
            time_based_copy(Some(6)),
            "Start your day with meaningful connections."
        );
        assert_eq!(time_based_background(Some(23)), "#F6F6F6");

        let feed = intent_feed(Vec::new(), Vec::new(), Some(13));
        assert!(feed.ordered.is_empty());
        assert_eq!(feed.background, "#FFFFFF");
        assert_eq!(feed.header_copy, "Afternoon moments of genuine connection.");
    }

    #[test]
    fn ambient_vibes_unknown_title_is_empty() {
        assert!(ambient_vibes("Unknown".to_string()).is_empty());
        assert!((3..=4).contains(&ambient_vibes("Creative Energy".to_string()).len()));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

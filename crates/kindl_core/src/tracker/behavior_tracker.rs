//! Behavior tracker state and scoring.
//!
//! # Responsibility
//! - Own every behavior counter for one app process.
//! - Provide ordering helpers (`recently_viewed`, `ordered_by_score`).
//!
//! # Invariants
//! - `count` grows by exactly one per `track_view`.
//! - `scroll_depth` is max-hold.
//! - Orderings are stable: equal keys keep input (or first-reference) order.
//! - Negative durations/depths are clamped to zero; non-finite depths are
//!   rejected.

use crate::clock::{Clock, SystemClock};
use crate::config::{ScoreWeights, MS_PER_DAY};
use crate::model::behavior::{
    BehaviorSnapshot, IntentViewEntry, IntentViewRecord, ProfileViewRecord, ReactionKind,
    ReactionTally,
};
use crate::model::intent::{Intent, IntentId, ProfileId};
use crate::tracker::{TrackerError, TrackerResult};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Per-process behavior counters with derived scoring.
#[derive(Debug)]
pub struct BehaviorTracker<C: Clock = SystemClock> {
    clock: C,
    weights: ScoreWeights,
    session_start: i64,
    intent_views: Vec<IntentViewEntry>,
    view_index: HashMap<IntentId, usize>,
    reactions: BTreeMap<IntentId, ReactionTally>,
    profile_views: BTreeMap<ProfileId, ProfileViewRecord>,
}

impl Default for BehaviorTracker<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> BehaviorTracker<C> {
    /// Creates an empty tracker with default score weights.
    ///
    /// `session_start` is captured from `clock` here and never changes.
    pub fn new(clock: C) -> Self {
        Self::with_weights(clock, ScoreWeights::default())
    }

    pub fn with_weights(clock: C, weights: ScoreWeights) -> Self {
        let session_start = clock.now_ms();
        Self {
            clock,
            weights,
            session_start,
            intent_views: Vec::new(),
            view_index: HashMap::new(),
            reactions: BTreeMap::new(),
            profile_views: BTreeMap::new(),
        }
    }

    pub fn session_start(&self) -> i64 {
        self.session_start
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Records one view of `intent_id` at the current clock time.
    pub fn track_view(&mut self, intent_id: &str) {
        let now = self.clock.now_ms();
        let record = self.view_record_mut(intent_id);
        record.count = record.count.saturating_add(1);
        record.last_viewed = Some(now);
        debug!(
            "event=track_view module=tracker status=ok intent_id={} count={}",
            intent_id, record.count
        );
    }

    /// Adds dwell time for `intent_id`.
    ///
    /// Negative durations are clamped to zero.
    pub fn track_time_spent(&mut self, intent_id: &str, duration_ms: i64) {
        let clamped = clamp_duration(intent_id, duration_ms);
        let record = self.view_record_mut(intent_id);
        record.total_time_spent_ms = record.total_time_spent_ms.saturating_add(clamped);
        debug!(
            "event=track_time_spent module=tracker status=ok intent_id={} total_ms={}",
            intent_id, record.total_time_spent_ms
        );
    }

    /// Raises the observed scroll depth for `intent_id`.
    ///
    /// # Errors
    /// - `InvalidArgument` when `depth` is NaN or infinite. State is untouched.
    pub fn track_scroll_depth(&mut self, intent_id: &str, depth: f64) -> TrackerResult<()> {
        if !depth.is_finite() {
            return Err(TrackerError::InvalidArgument(format!(
                "scroll depth must be finite, got `{depth}`"
            )));
        }
        let depth = if depth < 0.0 {
            warn!(
                "event=track_scroll_depth module=tracker status=clamped intent_id={} depth={}",
                intent_id, depth
            );
            0.0
        } else {
            depth
        };

        let record = self.view_record_mut(intent_id);
        record.observe_scroll_depth(depth);
        Ok(())
    }

    /// Increments the reaction tally for `intent_id`.
    pub fn track_reaction(&mut self, intent_id: &str, kind: ReactionKind) {
        let tally = self.reactions.entry(intent_id.to_string()).or_default();
        tally.increment(kind);
        debug!(
            "event=track_reaction module=tracker status=ok intent_id={} reaction={}",
            intent_id, kind
        );
    }

    /// Parses a wire reaction id and records it.
    ///
    /// # Errors
    /// - `InvalidArgument` when `reaction` is not a known kind. No record is
    ///   created in that case.
    pub fn track_reaction_str(&mut self, intent_id: &str, reaction: &str) -> TrackerResult<()> {
        let kind = reaction.parse::<ReactionKind>()?;
        self.track_reaction(intent_id, kind);
        Ok(())
    }

    /// Records one open of a profile card and its dwell time.
    pub fn track_profile_view(&mut self, profile_id: &str, time_spent_ms: i64) {
        let clamped = clamp_duration(profile_id, time_spent_ms);
        let record = self.profile_views.entry(profile_id.to_string()).or_default();
        record.count = record.count.saturating_add(1);
        record.time_spent_ms = record.time_spent_ms.saturating_add(clamped);
    }

    pub fn view_record(&self, intent_id: &str) -> Option<&IntentViewRecord> {
        self.view_index
            .get(intent_id)
            .map(|&position| &self.intent_views[position].record)
    }

    /// Returns the reaction tally, zero-valued for unknown ids.
    pub fn reactions(&self, intent_id: &str) -> ReactionTally {
        self.reactions.get(intent_id).copied().unwrap_or_default()
    }

    pub fn profile_view(&self, profile_id: &str) -> Option<&ProfileViewRecord> {
        self.profile_views.get(profile_id)
    }

    /// Returns up to `limit` viewed intent ids, most recent first.
    ///
    /// Intents that were never viewed are excluded. Equal timestamps keep
    /// first-reference order.
    pub fn recently_viewed(&self, limit: usize) -> Vec<IntentId> {
        let mut viewed = self
            .intent_views
            .iter()
            .filter_map(|entry| {
                entry
                    .record
                    .last_viewed
                    .map(|last_viewed| (entry.intent_id.as_str(), last_viewed))
            })
            .collect::<Vec<_>>();
        viewed.sort_by(|a, b| b.1.cmp(&a.1));
        viewed
            .into_iter()
            .take(limit)
            .map(|(intent_id, _)| intent_id.to_string())
            .collect()
    }

    /// Computes the composite behavior score for `intent_id`.
    ///
    /// Pure read: unknown ids score from zero-valued records without being
    /// inserted.
    pub fn score(&self, intent_id: &str) -> f64 {
        let weights = &self.weights;
        let reactions = self.reactions(intent_id);
        let reaction_score = weights.feels_right * f64::from(reactions.feels_right)
            - weights.not_vibe * f64::from(reactions.not_vibe)
            + weights.maybe_later * f64::from(reactions.maybe_later);

        let Some(view) = self.view_record(intent_id) else {
            return reaction_score;
        };

        let view_score = weights.view * f64::from(view.count);
        let time_score = (view.total_time_spent_ms as f64 / 1000.0).min(weights.time_cap);
        let depth_score = weights.scroll_depth * view.scroll_depth;
        let recency_score = view
            .last_viewed
            .map_or(0.0, |last_viewed| self.recency_score(last_viewed));

        view_score + time_score + depth_score + reaction_score + recency_score
    }

    /// Stable sort of `intent_ids` by descending score.
    pub fn ordered_by_score<S: AsRef<str>>(&self, intent_ids: &[S]) -> Vec<IntentId> {
        let mut scored = intent_ids
            .iter()
            .map(|id| (id.as_ref(), self.score(id.as_ref())))
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(id, _)| id.to_string()).collect()
    }

    /// Stable sort of feed intents by descending score of their ids.
    pub fn ordered_intents(&self, intents: &[Intent]) -> Vec<Intent> {
        let mut scored = intents
            .iter()
            .map(|intent| (intent, self.score(&intent.id)))
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(intent, _)| intent.clone()).collect()
    }

    /// Exports all counters for persistence.
    pub fn snapshot(&self) -> BehaviorSnapshot {
        BehaviorSnapshot {
            intent_views: self.intent_views.clone(),
            reactions: self.reactions.clone(),
            profile_views: self.profile_views.clone(),
        }
    }

    /// Replaces all counters with `snapshot`.
    ///
    /// `session_start` is kept. Duplicate intent ids in the snapshot collapse
    /// onto their first occurrence.
    pub fn restore(&mut self, snapshot: BehaviorSnapshot) {
        self.intent_views.clear();
        self.view_index.clear();
        for entry in snapshot.intent_views {
            if self.view_index.contains_key(&entry.intent_id) {
                warn!(
                    "event=tracker_restore module=tracker status=skipped reason=duplicate_intent intent_id={}",
                    entry.intent_id
                );
                continue;
            }
            self.view_index
                .insert(entry.intent_id.clone(), self.intent_views.len());
            self.intent_views.push(entry);
        }
        self.reactions = snapshot.reactions;
        self.profile_views = snapshot.profile_views;
    }

    fn recency_score(&self, last_viewed: i64) -> f64 {
        let age_ms = self.clock.now_ms().saturating_sub(last_viewed).max(0);
        let age_days = age_ms as f64 / MS_PER_DAY;
        (self.weights.recency_max - age_days * self.weights.recency_decay_per_day).max(0.0)
    }

    fn view_record_mut(&mut self, intent_id: &str) -> &mut IntentViewRecord {
        let position = match self.view_index.get(intent_id) {
            Some(&position) => position,
            None => {
                let position = self.intent_views.len();
                self.intent_views.push(IntentViewEntry {
                    intent_id: intent_id.to_string(),
                    record: IntentViewRecord::default(),
                });
                self.view_index.insert(intent_id.to_string(), position);
                position
            }
        };
        &mut self.intent_views[position].record
    }
}

fn clamp_duration(id: &str, duration_ms: i64) -> u64 {
    if duration_ms < 0 {
        warn!(
            "event=track_duration module=tracker status=clamped id={} duration_ms={}",
            id, duration_ms
        );
    }
    u64::try_from(duration_ms).unwrap_or(0)
}

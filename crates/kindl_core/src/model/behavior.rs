//! Behavior counter records.
//!
//! # Responsibility
//! - Define per-intent view/engagement counters and reaction tallies.
//! - Define the serializable snapshot exchanged with persistence stores.
//!
//! # Invariants
//! - `IntentViewRecord::count` grows by exactly one per view event.
//! - `IntentViewRecord::scroll_depth` is a running maximum and never decreases.
//! - Snapshot `intent_views` preserves first-reference order.

use crate::model::intent::{IntentId, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Engagement counters for one intent category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentViewRecord {
    /// Number of view events.
    pub count: u32,
    /// Unix epoch milliseconds of the latest view, `None` until first view.
    pub last_viewed: Option<i64>,
    /// Accumulated dwell time in milliseconds.
    pub total_time_spent_ms: u64,
    /// Deepest scroll position observed (fraction or pixels, caller-defined).
    pub scroll_depth: f64,
}

impl IntentViewRecord {
    /// Raises `scroll_depth` to `depth` if deeper; never lowers it.
    pub fn observe_scroll_depth(&mut self, depth: f64) {
        self.scroll_depth = self.scroll_depth.max(depth);
    }
}

/// Quick reaction a user can leave on an intent card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactionKind {
    /// "Feels right".
    FeelsRight,
    /// "Maybe later".
    MaybeLater,
    /// "Not my vibe".
    NotVibe,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 3] = [Self::FeelsRight, Self::MaybeLater, Self::NotVibe];

    /// Returns the stable wire id used by UI callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FeelsRight => "feels-right",
            Self::MaybeLater => "maybe-later",
            Self::NotVibe => "not-vibe",
        }
    }
}

impl Display for ReactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a reaction id is not one of the known kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReactionKind(pub String);

impl Display for UnknownReactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown reaction kind `{}`; expected feels-right|maybe-later|not-vibe",
            self.0
        )
    }
}

impl Error for UnknownReactionKind {}

impl FromStr for ReactionKind {
    type Err = UnknownReactionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "feels-right" => Ok(Self::FeelsRight),
            "maybe-later" => Ok(Self::MaybeLater),
            "not-vibe" => Ok(Self::NotVibe),
            other => Err(UnknownReactionKind(other.to_string())),
        }
    }
}

/// Reaction counters for one intent category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTally {
    #[serde(rename = "feels-right")]
    pub feels_right: u32,
    #[serde(rename = "maybe-later")]
    pub maybe_later: u32,
    #[serde(rename = "not-vibe")]
    pub not_vibe: u32,
}

impl ReactionTally {
    pub fn increment(&mut self, kind: ReactionKind) {
        let slot = match kind {
            ReactionKind::FeelsRight => &mut self.feels_right,
            ReactionKind::MaybeLater => &mut self.maybe_later,
            ReactionKind::NotVibe => &mut self.not_vibe,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Engagement counters for one profile card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileViewRecord {
    pub count: u32,
    pub time_spent_ms: u64,
}

/// One intent view record together with its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentViewEntry {
    pub intent_id: IntentId,
    #[serde(flatten)]
    pub record: IntentViewRecord,
}

/// Full tracker state exchanged with a `BehaviorStore`.
///
/// `session_start` is deliberately absent: a session always starts at
/// tracker construction, even when counters are restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    /// Intent view records in first-reference order.
    pub intent_views: Vec<IntentViewEntry>,
    pub reactions: BTreeMap<IntentId, ReactionTally>,
    pub profile_views: BTreeMap<ProfileId, ProfileViewRecord>,
}

impl BehaviorSnapshot {
    /// Returns whether the snapshot carries no counters at all.
    pub fn is_empty(&self) -> bool {
        self.intent_views.is_empty() && self.reactions.is_empty() && self.profile_views.is_empty()
    }

    /// Checks record invariants that the type system does not carry.
    ///
    /// # Errors
    /// - `InvalidSnapshot` for a negative or non-finite scroll depth.
    pub fn validate(&self) -> Result<(), InvalidSnapshot> {
        match self
            .intent_views
            .iter()
            .find(|entry| !entry.record.scroll_depth.is_finite() || entry.record.scroll_depth < 0.0)
        {
            Some(entry) => Err(InvalidSnapshot(format!(
                "invalid scroll depth `{}` for intent `{}`",
                entry.record.scroll_depth, entry.intent_id
            ))),
            None => Ok(()),
        }
    }
}

/// Snapshot content that a tracker could never have produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSnapshot(pub String);

impl Display for InvalidSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for InvalidSnapshot {}

#[cfg(test)]
mod tests {
    use super::{
        BehaviorSnapshot, IntentViewEntry, IntentViewRecord, ReactionKind, ReactionTally,
        UnknownReactionKind,
    };

    #[test]
    fn reaction_kind_parses_wire_ids() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind.as_str().parse::<ReactionKind>(), Ok(kind));
        }
        assert_eq!(
            "love-it".parse::<ReactionKind>(),
            Err(UnknownReactionKind("love-it".to_string()))
        );
    }

    #[test]
    fn scroll_depth_holds_maximum() {
        let mut record = IntentViewRecord::default();
        record.observe_scroll_depth(0.3);
        record.observe_scroll_depth(0.1);
        assert_eq!(record.scroll_depth, 0.3);
        record.observe_scroll_depth(0.5);
        assert_eq!(record.scroll_depth, 0.5);
    }

    #[test]
    fn reaction_tally_serializes_with_kebab_keys() {
        let mut tally = ReactionTally::default();
        tally.increment(ReactionKind::FeelsRight);
        tally.increment(ReactionKind::NotVibe);

        let json = serde_json::to_value(tally).unwrap();
        assert_eq!(json["feels-right"], 1);
        assert_eq!(json["maybe-later"], 0);
        assert_eq!(json["not-vibe"], 1);
    }

    #[test]
    fn validate_rejects_negative_and_nan_depths() {
        let mut snapshot = BehaviorSnapshot::default();
        snapshot.intent_views.push(IntentViewEntry {
            intent_id: "4".to_string(),
            record: IntentViewRecord {
                scroll_depth: 0.8,
                ..IntentViewRecord::default()
            },
        });
        assert_eq!(snapshot.validate(), Ok(()));

        for depth in [-0.5, f64::NAN] {
            snapshot.intent_views[0].record.scroll_depth = depth;
            let err = snapshot.validate().unwrap_err();
            assert!(err.0.contains("intent `4`"), "{err}");
        }
    }
}

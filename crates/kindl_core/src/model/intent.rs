//! Intent category model.
//!
//! An intent is a discovery feed category ("Deep Conversations", ...). The
//! feed carries both a stable id, used for behavior counters, and a title,
//! used to look up affinity and ambient tags.

use serde::{Deserialize, Serialize};

/// Stable identifier of an intent category.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type IntentId = String;

/// Stable identifier of a discovery profile card.
pub type ProfileId = String;

/// Presentable intent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Key for tracker counters.
    pub id: IntentId,
    /// Key for static tag tables.
    pub title: String,
}

impl Intent {
    pub fn new(id: impl Into<IntentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

const DEFAULT_CATALOG: &[(&str, &str)] = &[
    ("1", "Slow & Intentional"),
    ("2", "Meaningful Connection"),
    ("3", "Deep Conversations"),
    ("4", "Creative Energy"),
    ("5", "Outdoors & Active"),
    ("6", "Food & Coffee Dates"),
    ("7", "Spiritual & Calm"),
];

/// Returns the intent categories shown by the default discovery feed, in
/// feed order.
pub fn default_intents() -> Vec<Intent> {
    DEFAULT_CATALOG
        .iter()
        .map(|(id, title)| Intent::new(*id, *title))
        .collect()
}

/// Finds an intent by id in a feed slice.
pub fn find_intent<'a>(intents: &'a [Intent], id: &str) -> Option<&'a Intent> {
    intents.iter().find(|intent| intent.id == id)
}

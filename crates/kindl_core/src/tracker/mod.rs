//! In-memory behavior tracking.
//!
//! # Responsibility
//! - Record intent views, dwell time, scroll depth and reactions.
//! - Derive a recency- and engagement-weighted score per intent.
//!
//! # Invariants
//! - Unknown ids are never an error; records are created on first use.
//! - Score reads never mutate tracker state.

pub mod behavior_tracker;

use crate::model::behavior::UnknownReactionKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use behavior_tracker::BehaviorTracker;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Tracker input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Input outside the accepted domain (unknown reaction, NaN depth, ...).
    InvalidArgument(String),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl Error for TrackerError {}

impl From<UnknownReactionKind> for TrackerError {
    fn from(value: UnknownReactionKind) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

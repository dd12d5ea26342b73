//! Domain model for behavior tracking and intent presentation.
//!
//! # Responsibility
//! - Define the counters recorded per intent and per profile.
//! - Define the intent categories shown by discovery feeds.
//!
//! # Invariants
//! - Tracker state is keyed by `IntentId`; static tag tables are keyed by
//!   intent title.
//! - Records are zero-valued on creation and only grow through tracker calls.

pub mod behavior;
pub mod intent;

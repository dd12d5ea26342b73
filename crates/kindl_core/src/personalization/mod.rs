//! Personalized ranking and presentation hints.
//!
//! # Responsibility
//! - Rank and blend intent categories from tracker scores and tag affinity.
//! - Provide display hints (ambient vibes, time-of-day copy/background).
//!
//! # Invariants
//! - Nothing here mutates tracker state.
//! - Rankings are stable sorts; equal scores keep feed order.

pub mod engine;
pub mod tables;
pub mod time_of_day;

pub use engine::PersonalizationEngine;
pub use time_of_day::{current_hour, time_based_background, time_based_copy};

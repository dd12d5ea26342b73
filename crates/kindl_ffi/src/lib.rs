//! Flutter-facing bridge crate.
//!
//! # Responsibility
//! - Re-export the FRB use-case API over `kindl_core`.

pub mod api;

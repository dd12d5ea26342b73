//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate tracker, engine and store calls into app-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod session;

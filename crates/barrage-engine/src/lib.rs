//! Barrage Engine - Concurrent moderation core
//!
//! This crate implements the moderation core:
//! - Per-activity comment lifecycle (identity, queues, counters)
//! - Atomic batch hand-off to reviewers and display consumers
//! - Capability-token routing and admin authorization

pub mod activity;
pub mod engine;

pub use activity::*;
pub use engine::*;

//! Barrage Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout barrage:
//! - Identifiers (ActivityId, CommentId)
//! - The comment model and its per-kind validation
//! - Moderation status
//! - Capability tokens
//! - The error taxonomy

pub mod comment;
pub mod error;
pub mod id;
pub mod status;
pub mod token;

pub use comment::*;
pub use error::*;
pub use id::*;
pub use status::*;
pub use token::*;

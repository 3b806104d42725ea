//! Moderation status
//!
//! The lifecycle is `Initial -> Pending -> {Approved, Denied}` and
//! `Approved -> Displayed`. Denied and Displayed are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Moderation state of a labeled comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Just submitted, waiting in the review queue
    Initial,
    /// Handed to a reviewer, decision outstanding
    Pending,
    /// Accepted, waiting in the display queue
    Approved,
    /// Rejected by a reviewer
    Denied,
    /// Consumed by a display client
    Displayed,
}

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Initial => "initial",
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Denied => "denied",
            CommentStatus::Displayed => "displayed",
        }
    }

    /// Whether no further transition can touch this state
    pub fn is_terminal(self) -> bool {
        matches!(self, CommentStatus::Denied | CommentStatus::Displayed)
    }
}

impl Default for CommentStatus {
    fn default() -> Self {
        CommentStatus::Initial
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Wire-format reply structures
//!
//! Flat, serde-friendly views of the engine's types. Field names are part
//! of the wire contract; the engine types stay free to evolve behind them.

use std::collections::HashMap;

use serde::Serialize;

use barrage_core::{ActivityId, CommentId, CommentStatus};
use barrage_engine::{ActivityDescriptor, ActivityDigest, LabeledComment};

/// A labeled comment flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct FlatComment {
    pub id: CommentId,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub attributes: HashMap<String, String>,
    pub status: CommentStatus,
}

impl From<&LabeledComment> for FlatComment {
    fn from(labeled: &LabeledComment) -> Self {
        FlatComment {
            id: labeled.id,
            kind: labeled.comment.kind().to_string(),
            content: labeled.comment.content().to_string(),
            attributes: labeled.comment.attributes(),
            status: labeled.status,
        }
    }
}

/// A full activity view, tokens included (admin replies only)
#[derive(Debug, Clone, Serialize)]
pub struct FlatActivity {
    pub id: ActivityId,
    pub name: String,
    pub comment_token: String,
    pub review_token: String,
    pub display_token: String,
    pub review_on: bool,
    pub total_count: u64,
    pub approved_count: u64,
    pub denied_count: u64,
    pub displayed_count: u64,
}

impl From<&ActivityDescriptor> for FlatActivity {
    fn from(desc: &ActivityDescriptor) -> Self {
        FlatActivity {
            id: desc.id,
            name: desc.name.clone(),
            comment_token: desc.comment_token.as_str().to_string(),
            review_token: desc.review_token.as_str().to_string(),
            display_token: desc.display_token.as_str().to_string(),
            review_on: desc.review_on,
            total_count: desc.total_count,
            approved_count: desc.approved_count,
            denied_count: desc.denied_count,
            displayed_count: desc.displayed_count,
        }
    }
}

/// Counter-only activity view, safe for any token holder
#[derive(Debug, Clone, Serialize)]
pub struct FlatActivityDigest {
    pub id: ActivityId,
    pub name: String,
    pub total_count: u64,
    pub approved_count: u64,
    pub denied_count: u64,
    pub displayed_count: u64,
}

impl From<&ActivityDigest> for FlatActivityDigest {
    fn from(digest: &ActivityDigest) -> Self {
        FlatActivityDigest {
            id: digest.id,
            name: digest.name.clone(),
            total_count: digest.total_count,
            approved_count: digest.approved_count,
            denied_count: digest.denied_count,
            displayed_count: digest.displayed_count,
        }
    }
}

pub fn flatten_comments(batch: &[LabeledComment]) -> Vec<FlatComment> {
    batch.iter().map(FlatComment::from).collect()
}

//! Activity - one moderated comment stream
//!
//! An activity owns the full lifecycle of its comments: identity
//! assignment, the review and display queues, and the status transitions.
//! Every piece of mutable state sits behind a single mutex, so each
//! operation is one short critical section and batch hand-off is atomic
//! with respect to concurrent submitters.

use std::collections::HashMap;
use std::mem;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use barrage_core::{ActivityId, AuthToken, Comment, CommentId, CommentStatus};

/// Initial capacity for both moderation queues
pub const QUEUE_DEFAULT_CAPACITY: usize = 1000;

/// A comment wrapped with its assigned identity and moderation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledComment {
    pub id: CommentId,
    pub status: CommentStatus,
    pub comment: Comment,
}

/// The three capability tokens of one activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTokens {
    pub comment: AuthToken,
    pub review: AuthToken,
    pub display: AuthToken,
}

impl ActivityTokens {
    /// Whether the presented token is any of the three
    pub fn contains(&self, token: &str) -> bool {
        self.comment == token || self.review == token || self.display == token
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthToken> {
        [&self.comment, &self.review, &self.display].into_iter()
    }
}

/// Mutable per-activity state, guarded by the activity mutex
struct ActivityState {
    name: String,
    review_on: bool,
    comments: HashMap<CommentId, LabeledComment>,
    initial_queue: Vec<CommentId>,
    approved_queue: Vec<CommentId>,
    total: u64,
    approved: u64,
    denied: u64,
    displayed: u64,
}

impl ActivityState {
    fn new(name: String) -> Self {
        ActivityState {
            name,
            review_on: true,
            comments: HashMap::new(),
            initial_queue: Vec::with_capacity(QUEUE_DEFAULT_CAPACITY),
            approved_queue: Vec::with_capacity(QUEUE_DEFAULT_CAPACITY),
            total: 0,
            approved: 0,
            denied: 0,
            displayed: 0,
        }
    }
}

/// One independently moderated comment stream
///
/// Identity and tokens are fixed at creation and survive [`Activity::reset`];
/// everything else lives in the mutex. Batches returned by
/// [`Activity::review`], [`Activity::display`] and [`Activity::fetch`] are
/// detached clones - internal collections are never handed out, all
/// mutation routes back through these methods.
pub struct Activity {
    id: ActivityId,
    tokens: ActivityTokens,
    state: Mutex<ActivityState>,
}

impl Activity {
    pub fn new(id: ActivityId, name: impl Into<String>, tokens: ActivityTokens) -> Self {
        Activity {
            id,
            tokens,
            state: Mutex::new(ActivityState::new(name.into())),
        }
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn tokens(&self) -> &ActivityTokens {
        &self.tokens
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn rename(&self, name: impl Into<String>) {
        self.state.lock().name = name.into();
    }

    pub fn review_enabled(&self) -> bool {
        self.state.lock().review_on
    }

    pub fn set_review(&self, on: bool) {
        self.state.lock().review_on = on;
    }

    /// Add a comment: assign the next id, status Initial, enqueue for review.
    ///
    /// Ids are 1..N in call order; `total` doubles as the id source.
    pub fn add(&self, comment: Comment) -> LabeledComment {
        let mut state = self.state.lock();
        state.total += 1;
        let labeled = LabeledComment {
            id: CommentId::new(state.total),
            status: CommentStatus::Initial,
            comment,
        };
        state.comments.insert(labeled.id, labeled.clone());
        state.initial_queue.push(labeled.id);
        tracing::debug!(activity = %self.id, id = %labeled.id, "comment added");
        labeled
    }

    /// Hand the entire review backlog to one caller.
    ///
    /// Swaps the initial queue out and installs a fresh one in a single
    /// critical section, so a comment is returned by at most one `review`
    /// call no matter how callers interleave. Every returned item is
    /// transitioned Initial -> Pending.
    pub fn review(&self) -> Vec<LabeledComment> {
        let mut state = self.state.lock();
        let drained = mem::replace(
            &mut state.initial_queue,
            Vec::with_capacity(QUEUE_DEFAULT_CAPACITY),
        );
        let mut batch = Vec::with_capacity(drained.len());
        for id in drained {
            if let Some(labeled) = state.comments.get_mut(&id) {
                labeled.status = CommentStatus::Pending;
                batch.push(labeled.clone());
            }
        }
        tracing::debug!(activity = %self.id, count = batch.len(), "review batch handed out");
        batch
    }

    /// Approve comments by id: status -> Approved, enqueue for display.
    ///
    /// Unknown ids are skipped. There is deliberately no guard against
    /// re-approving: approving an item twice enqueues and counts it twice,
    /// matching the lenient moderation contract.
    pub fn approve(&self, ids: &[CommentId]) -> usize {
        let mut state = self.state.lock();
        let mut applied = 0;
        for id in ids {
            if let Some(labeled) = state.comments.get_mut(id) {
                labeled.status = CommentStatus::Approved;
                state.approved_queue.push(*id);
                applied += 1;
            }
        }
        state.approved += applied as u64;
        applied
    }

    /// Deny comments by id: status -> Denied.
    ///
    /// Denied comments leave the queue flow; they stay reachable only
    /// through [`Activity::fetch`].
    pub fn deny(&self, ids: &[CommentId]) -> usize {
        let mut state = self.state.lock();
        let mut applied = 0;
        for id in ids {
            if let Some(labeled) = state.comments.get_mut(id) {
                labeled.status = CommentStatus::Denied;
                applied += 1;
            }
        }
        state.denied += applied as u64;
        applied
    }

    /// Hand the approved backlog to one display consumer.
    ///
    /// Same atomic swap as [`Activity::review`]; every returned item is
    /// transitioned to Displayed and counted.
    pub fn display(&self) -> Vec<LabeledComment> {
        let mut state = self.state.lock();
        let drained = mem::replace(
            &mut state.approved_queue,
            Vec::with_capacity(QUEUE_DEFAULT_CAPACITY),
        );
        let mut batch = Vec::with_capacity(drained.len());
        for id in drained {
            if let Some(labeled) = state.comments.get_mut(&id) {
                labeled.status = CommentStatus::Displayed;
                batch.push(labeled.clone());
            }
        }
        state.displayed += batch.len() as u64;
        tracing::debug!(activity = %self.id, count = batch.len(), "display batch handed out");
        batch
    }

    /// Look up comments by id; unknown ids are silently dropped, so the
    /// result may be shorter than the input.
    pub fn fetch(&self, ids: &[CommentId]) -> Vec<LabeledComment> {
        let state = self.state.lock();
        ids.iter()
            .filter_map(|id| state.comments.get(id).cloned())
            .collect()
    }

    /// Zero all counters and drop every comment and both queues.
    ///
    /// Identity, tokens, name, and the review flag survive.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.total = 0;
        state.approved = 0;
        state.denied = 0;
        state.displayed = 0;
        state.comments = HashMap::new();
        state.initial_queue = Vec::with_capacity(QUEUE_DEFAULT_CAPACITY);
        state.approved_queue = Vec::with_capacity(QUEUE_DEFAULT_CAPACITY);
        tracing::debug!(activity = %self.id, "activity reset");
    }

    /// Full snapshot for admin views and activity creation replies
    pub fn descriptor(&self) -> ActivityDescriptor {
        let state = self.state.lock();
        ActivityDescriptor {
            id: self.id,
            name: state.name.clone(),
            comment_token: self.tokens.comment.clone(),
            review_token: self.tokens.review.clone(),
            display_token: self.tokens.display.clone(),
            review_on: state.review_on,
            total_count: state.total,
            approved_count: state.approved,
            denied_count: state.denied,
            displayed_count: state.displayed,
        }
    }

    /// Counter snapshot for token-holder stats views (no tokens exposed)
    pub fn digest(&self) -> ActivityDigest {
        let state = self.state.lock();
        ActivityDigest {
            id: self.id,
            name: state.name.clone(),
            total_count: state.total,
            approved_count: state.approved,
            denied_count: state.denied,
            displayed_count: state.displayed,
        }
    }
}

/// Point-in-time view of one activity, including its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDescriptor {
    pub id: ActivityId,
    pub name: String,
    pub comment_token: AuthToken,
    pub review_token: AuthToken,
    pub display_token: AuthToken,
    pub review_on: bool,
    pub total_count: u64,
    pub approved_count: u64,
    pub denied_count: u64,
    pub displayed_count: u64,
}

/// Point-in-time counter view, safe to show to any token holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDigest {
    pub id: ActivityId,
    pub name: String,
    pub total_count: u64,
    pub approved_count: u64,
    pub denied_count: u64,
    pub displayed_count: u64,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn test_activity() -> Activity {
        Activity::new(
            ActivityId::new(1),
            "test",
            ActivityTokens {
                comment: AuthToken::from_raw("cc123456"),
                review: AuthToken::from_raw("rr123456"),
                display: AuthToken::from_raw("dd123456"),
            },
        )
    }

    fn text(content: &str) -> Comment {
        let mut attrs = HashMap::new();
        attrs.insert("text".to_string(), content.to_string());
        attrs.insert("color".to_string(), "red".to_string());
        Comment::new("text", &attrs).unwrap()
    }

    #[test]
    fn test_add_assigns_monotonic_ids() {
        let act = test_activity();
        for expect in 1..=5u64 {
            let labeled = act.add(text("hi"));
            assert_eq!(labeled.id, CommentId::new(expect));
            assert_eq!(labeled.status, CommentStatus::Initial);
        }
        assert_eq!(act.descriptor().total_count, 5);
    }

    #[test]
    fn test_happy_path() {
        let act = test_activity();
        let added = act.add(text("hi"));
        assert_eq!(added.id, CommentId::new(1));
        assert_eq!(added.status, CommentStatus::Initial);

        let batch = act.review();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, CommentId::new(1));
        assert_eq!(batch[0].status, CommentStatus::Pending);
        assert!(act.review().is_empty());

        act.approve(&[CommentId::new(1)]);
        let snap = act.descriptor();
        assert_eq!(snap.approved_count, 1);
        assert_eq!(
            act.fetch(&[CommentId::new(1)])[0].status,
            CommentStatus::Approved
        );

        let shown = act.display();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].status, CommentStatus::Displayed);
        assert!(act.display().is_empty());
        assert_eq!(act.descriptor().displayed_count, 1);
    }

    #[test]
    fn test_deny_path() {
        let act = test_activity();
        act.add(text("a"));
        act.add(text("b"));

        let batch = act.review();
        assert_eq!(batch.len(), 2);

        let ids: Vec<_> = batch.iter().map(|c| c.id).collect();
        act.deny(&ids);
        assert_eq!(act.descriptor().denied_count, 2);
        for labeled in act.fetch(&ids) {
            assert_eq!(labeled.status, CommentStatus::Denied);
        }
        // Denied comments never reach the display queue
        assert!(act.display().is_empty());
    }

    #[test]
    fn test_fetch_skips_unknown_ids() {
        let act = test_activity();
        act.add(text("hi"));
        let fetched = act.fetch(&[CommentId::new(1), CommentId::new(999)]);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, CommentId::new(1));
    }

    #[test]
    fn test_reapprove_double_counts() {
        // Not guarded on purpose: approving twice counts and enqueues twice
        let act = test_activity();
        act.add(text("hi"));
        act.review();
        act.approve(&[CommentId::new(1)]);
        act.approve(&[CommentId::new(1)]);
        assert_eq!(act.descriptor().approved_count, 2);
        assert_eq!(act.display().len(), 2);
    }

    #[test]
    fn test_reset_clears_transient_state_only() {
        let act = test_activity();
        act.add(text("a"));
        act.add(text("b"));
        act.review();
        act.approve(&[CommentId::new(1)]);
        act.deny(&[CommentId::new(2)]);
        act.display();
        act.rename("renamed");
        act.set_review(false);

        act.reset();

        let snap = act.descriptor();
        assert_eq!(snap.total_count, 0);
        assert_eq!(snap.approved_count, 0);
        assert_eq!(snap.denied_count, 0);
        assert_eq!(snap.displayed_count, 0);
        assert!(act.fetch(&[CommentId::new(1), CommentId::new(2)]).is_empty());
        assert!(act.review().is_empty());
        assert!(act.display().is_empty());

        // Identity, tokens, name, review flag survive
        assert_eq!(snap.id, ActivityId::new(1));
        assert_eq!(snap.name, "renamed");
        assert!(!snap.review_on);
        assert_eq!(act.tokens().comment, "cc123456");

        // Ids restart from 1
        assert_eq!(act.add(text("c")).id, CommentId::new(1));
    }

    #[test]
    fn test_review_batch_is_detached() {
        let act = test_activity();
        act.add(text("hi"));
        let mut batch = act.review();
        batch[0].status = CommentStatus::Denied;
        // Mutating the returned batch must not leak into the activity
        assert_eq!(
            act.fetch(&[CommentId::new(1)])[0].status,
            CommentStatus::Pending
        );
    }

    proptest! {
        #[test]
        fn prop_ids_are_one_to_n(n in 1usize..200) {
            let act = test_activity();
            let ids: Vec<u64> = (0..n).map(|_| act.add(text("x")).id.0).collect();
            let expected: Vec<u64> = (1..=n as u64).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn prop_counters_match_batches(adds in 1usize..50, approvals in proptest::collection::vec(1u64..60, 0..20)) {
            let act = test_activity();
            for _ in 0..adds {
                act.add(text("x"));
            }
            act.review();
            let ids: Vec<CommentId> = approvals.iter().map(|&i| CommentId::new(i)).collect();
            let applied = act.approve(&ids);
            let valid = approvals.iter().filter(|&&i| i <= adds as u64).count();
            prop_assert_eq!(applied, valid);
            prop_assert_eq!(act.descriptor().approved_count, valid as u64);
            prop_assert_eq!(act.display().len(), valid);
            prop_assert_eq!(act.descriptor().displayed_count, valid as u64);
        }
    }
}

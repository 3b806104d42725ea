//! Engine - activity collection, token routing, admin authorization
//!
//! The engine owns every activity and the global token map. Authorization
//! is pure capability checking: an operation runs iff the presented token
//! equals one of the expected tokens, nothing else identifies the caller.
//! The token map is read-mostly, so it sits behind a RwLock: token
//! resolution takes the read lock, activity creation and deletion take the
//! write lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use barrage_core::{
    ActivityId, AuthToken, BarrageError, BarrageResult, Comment, CommentId, ACTIVITY_TOKEN_LEN,
    ADMIN_TOKEN_LEN,
};

use crate::{Activity, ActivityDescriptor, ActivityDigest, ActivityTokens, LabeledComment};

/// The capability a token grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Comment,
    Review,
    Display,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Comment => "comment",
            Role::Review => "review",
            Role::Display => "display",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable engine state, guarded by the engine RwLock
struct EngineState {
    activities: HashMap<ActivityId, Arc<Activity>>,
    tokens: HashMap<AuthToken, Arc<Activity>>,
    id_count: u64,
}

/// The moderation engine
///
/// Process-scoped aggregate: constructed once at startup and handed to the
/// request boundary; there is no ambient/static instance.
pub struct Engine {
    admin_token: AuthToken,
    state: RwLock<EngineState>,
}

impl Engine {
    /// Create an engine with a freshly generated admin token
    pub fn new() -> Self {
        Engine {
            admin_token: AuthToken::generate(ADMIN_TOKEN_LEN),
            state: RwLock::new(EngineState {
                activities: HashMap::new(),
                tokens: HashMap::new(),
                id_count: 0,
            }),
        }
    }

    /// The engine-wide admin token
    pub fn admin_token(&self) -> &AuthToken {
        &self.admin_token
    }

    fn is_admin(&self, token: &str) -> bool {
        self.admin_token == token
    }

    /// Identify the capability a token grants
    pub fn login(&self, token: &str) -> BarrageResult<Role> {
        if self.is_admin(token) {
            return Ok(Role::Admin);
        }
        let state = self.state.read();
        let activity = state.tokens.get(token).ok_or(BarrageError::NotAuthorized)?;
        let tokens = activity.tokens();
        if tokens.comment == token {
            Ok(Role::Comment)
        } else if tokens.review == token {
            Ok(Role::Review)
        } else {
            Ok(Role::Display)
        }
    }

    /// Create an activity with three freshly generated tokens.
    /// Admin only.
    pub fn new_activity(
        &self,
        admin_token: &str,
        name: &str,
    ) -> BarrageResult<ActivityDescriptor> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }

        let mut state = self.state.write();
        let comment = Self::mint_token(&state);
        let review = Self::mint_token_excluding(&state, &[&comment]);
        let display = Self::mint_token_excluding(&state, &[&comment, &review]);
        Ok(Self::install(&mut state, name, comment, review, display))
    }

    /// Create an activity with caller-chosen tokens.
    /// Admin only; fails with AlreadyExist when any token is taken.
    pub fn new_activity_with_tokens(
        &self,
        admin_token: &str,
        name: &str,
        comment: AuthToken,
        review: AuthToken,
        display: AuthToken,
    ) -> BarrageResult<ActivityDescriptor> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }

        let mut state = self.state.write();
        if comment == review || review == display || comment == display {
            return Err(BarrageError::AlreadyExist);
        }
        for token in [&comment, &review, &display] {
            if state.tokens.contains_key(token.as_str()) {
                return Err(BarrageError::AlreadyExist);
            }
        }
        Ok(Self::install(&mut state, name, comment, review, display))
    }

    /// Generate an activity token that collides with nothing in the map
    fn mint_token(state: &EngineState) -> AuthToken {
        loop {
            let token = AuthToken::generate(ACTIVITY_TOKEN_LEN);
            if !state.tokens.contains_key(token.as_str()) {
                return token;
            }
        }
    }

    fn mint_token_excluding(state: &EngineState, taken: &[&AuthToken]) -> AuthToken {
        loop {
            let token = Self::mint_token(state);
            if !taken.iter().any(|t| **t == token) {
                return token;
            }
        }
    }

    fn install(
        state: &mut EngineState,
        name: &str,
        comment: AuthToken,
        review: AuthToken,
        display: AuthToken,
    ) -> ActivityDescriptor {
        state.id_count += 1;
        let id = ActivityId::new(state.id_count);
        let activity = Arc::new(Activity::new(
            id,
            name,
            ActivityTokens {
                comment,
                review,
                display,
            },
        ));
        state.activities.insert(id, Arc::clone(&activity));
        for token in activity.tokens().iter() {
            state.tokens.insert(token.clone(), Arc::clone(&activity));
        }
        tracing::info!(activity = %id, name, "activity created");
        activity.descriptor()
    }

    /// Resolve a token to its activity. Pure lookup, no authorization.
    pub fn activity_by_token(&self, token: &str) -> Option<Arc<Activity>> {
        self.state.read().tokens.get(token).cloned()
    }

    fn activity_by_id(&self, id: ActivityId) -> BarrageResult<Arc<Activity>> {
        self.state
            .read()
            .activities
            .get(&id)
            .cloned()
            .ok_or(BarrageError::NotExist)
    }

    /// Snapshots of every activity. Admin only.
    pub fn activities(&self, admin_token: &str) -> BarrageResult<Vec<ActivityDescriptor>> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }
        let state = self.state.read();
        let mut all: Vec<_> = state.activities.values().map(|a| a.descriptor()).collect();
        all.sort_by_key(|d| d.id);
        Ok(all)
    }

    /// Delete an activity and revoke its tokens. Admin only.
    pub fn del_activity(&self, admin_token: &str, id: ActivityId) -> BarrageResult<()> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }
        let mut state = self.state.write();
        let activity = state.activities.remove(&id).ok_or(BarrageError::NotExist)?;
        for token in activity.tokens().iter() {
            state.tokens.remove(token.as_str());
        }
        tracing::info!(activity = %id, "activity deleted");
        Ok(())
    }

    /// Rename an activity. Admin only.
    pub fn rename_activity(
        &self,
        admin_token: &str,
        id: ActivityId,
        name: &str,
    ) -> BarrageResult<()> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }
        self.activity_by_id(id)?.rename(name);
        Ok(())
    }

    /// Turn moderation on for an activity. Admin only.
    pub fn review_on(&self, admin_token: &str, id: ActivityId) -> BarrageResult<()> {
        self.set_review(admin_token, id, true)
    }

    /// Turn moderation off for an activity. Admin only.
    pub fn review_off(&self, admin_token: &str, id: ActivityId) -> BarrageResult<()> {
        self.set_review(admin_token, id, false)
    }

    fn set_review(&self, admin_token: &str, id: ActivityId, on: bool) -> BarrageResult<()> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }
        self.activity_by_id(id)?.set_review(on);
        Ok(())
    }

    /// Clear an activity's comments, queues, and counters. Admin only.
    pub fn reset(&self, admin_token: &str, id: ActivityId) -> BarrageResult<()> {
        if !self.is_admin(admin_token) {
            return Err(BarrageError::NotAuthorized);
        }
        self.activity_by_id(id)?.reset();
        Ok(())
    }

    /// Submit a comment. Any of the activity's three tokens authorizes.
    ///
    /// When moderation is off the whole pending backlog is drained and
    /// approved on the spot, not just the new comment (see DESIGN.md).
    pub fn push(
        &self,
        token: &str,
        kind: &str,
        attributes: &HashMap<String, String>,
    ) -> BarrageResult<LabeledComment> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        if !activity.tokens().contains(token) {
            return Err(BarrageError::NotAuthorized);
        }

        let comment = Comment::new(kind, attributes)?;
        let labeled = activity.add(comment);

        if !activity.review_enabled() {
            let batch: Vec<CommentId> = activity.review().iter().map(|c| c.id).collect();
            activity.approve(&batch);
        }

        Ok(labeled)
    }

    /// Drain the review backlog. Review token only.
    pub fn review(&self, token: &str) -> BarrageResult<Vec<LabeledComment>> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        if activity.tokens().review != token {
            return Err(BarrageError::NotAuthorized);
        }
        Ok(activity.review())
    }

    /// Approve comments by id. Review token only; unknown ids are dropped.
    pub fn approve(&self, token: &str, ids: &[CommentId]) -> BarrageResult<()> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        if activity.tokens().review != token {
            return Err(BarrageError::NotAuthorized);
        }
        activity.approve(ids);
        Ok(())
    }

    /// Deny comments by id. Review token only; unknown ids are dropped.
    pub fn deny(&self, token: &str, ids: &[CommentId]) -> BarrageResult<()> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        if activity.tokens().review != token {
            return Err(BarrageError::NotAuthorized);
        }
        activity.deny(ids);
        Ok(())
    }

    /// Drain the approved backlog. Display token only.
    pub fn display(&self, token: &str) -> BarrageResult<Vec<LabeledComment>> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        if activity.tokens().display != token {
            return Err(BarrageError::NotAuthorized);
        }
        Ok(activity.display())
    }

    /// Counter snapshot for any of the activity's token holders
    pub fn digest(&self, token: &str) -> BarrageResult<ActivityDigest> {
        let activity = self.activity_by_token(token).ok_or(BarrageError::NotExist)?;
        Ok(activity.digest())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

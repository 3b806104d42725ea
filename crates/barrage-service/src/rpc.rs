//! JSON-RPC 1.0 method dispatch
//!
//! One POST body per call: `{"method": "Barrage.Push", "params": [{...}],
//! "id": 1}`. The reply mirrors the id and carries either a result object
//! or an error string. Params may be wrapped in a single-element array
//! (JSON-RPC 1.0 style) or sent as a bare object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use barrage_core::{ActivityId, CommentId};
use barrage_engine::Engine;

use crate::wire::{flatten_comments, FlatActivity, FlatActivityDigest, FlatComment};

/// Incoming call envelope
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

/// Outgoing reply envelope
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub result: Value,
    pub error: Option<String>,
    pub id: Value,
}

impl RpcResponse {
    fn ok(id: Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => RpcResponse {
                result: value,
                error: None,
                id,
            },
            Err(e) => RpcResponse {
                result: Value::Null,
                error: Some(e.to_string()),
                id,
            },
        }
    }

    fn err(id: Value, message: impl ToString) -> Self {
        RpcResponse {
            result: Value::Null,
            error: Some(message.to_string()),
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenParams {
    token: String,
}

#[derive(Debug, Deserialize)]
struct NewActivityParams {
    token: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ActivityIdParams {
    token: String,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RenameParams {
    token: String,
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PushParams {
    token: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attr: std::collections::HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct IdsParams {
    token: String,
    ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
struct LoginReply {
    #[serde(rename = "type")]
    role: String,
}

#[derive(Debug, Serialize)]
struct ActivityReply {
    activity: FlatActivity,
}

#[derive(Debug, Serialize)]
struct ActivitiesReply {
    activities: Vec<FlatActivity>,
}

#[derive(Debug, Serialize)]
struct DigestReply {
    activity: FlatActivityDigest,
}

#[derive(Debug, Serialize)]
struct CommentReply {
    comment: FlatComment,
}

#[derive(Debug, Serialize)]
struct CommentsReply {
    comments: Vec<FlatComment>,
}

#[derive(Debug, Serialize)]
struct EmptyReply {}

/// JSON-RPC 1.0 wraps params in an array; accept a bare object too
fn parse_params<T: DeserializeOwned>(raw: &Value) -> Result<T, String> {
    let inner = match raw {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    serde_json::from_value(inner).map_err(|_| "invalid params".to_string())
}

fn comment_ids(raw: &[u64]) -> Vec<CommentId> {
    raw.iter().copied().map(CommentId::new).collect()
}

/// Execute one call against the engine
pub fn dispatch(engine: &Engine, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    // Accept both "Barrage.Push" and bare "Push"
    let method = request
        .method
        .rsplit('.')
        .next()
        .unwrap_or(request.method.as_str());

    macro_rules! params {
        ($ty:ty) => {
            match parse_params::<$ty>(&request.params) {
                Ok(p) => p,
                Err(msg) => return RpcResponse::err(id, msg),
            }
        };
    }

    match method {
        "Login" => {
            let p = params!(TokenParams);
            match engine.login(&p.token) {
                Ok(role) => RpcResponse::ok(
                    id,
                    LoginReply {
                        role: role.as_str().to_string(),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "NewActivity" => {
            let p = params!(NewActivityParams);
            match engine.new_activity(&p.token, &p.name) {
                Ok(desc) => RpcResponse::ok(
                    id,
                    ActivityReply {
                        activity: FlatActivity::from(&desc),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Activities" => {
            let p = params!(TokenParams);
            match engine.activities(&p.token) {
                Ok(all) => RpcResponse::ok(
                    id,
                    ActivitiesReply {
                        activities: all.iter().map(FlatActivity::from).collect(),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "DelActivity" => {
            let p = params!(ActivityIdParams);
            match engine.del_activity(&p.token, ActivityId::new(p.id)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "RenameActivity" => {
            let p = params!(RenameParams);
            match engine.rename_activity(&p.token, ActivityId::new(p.id), &p.name) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "ReviewOn" => {
            let p = params!(ActivityIdParams);
            match engine.review_on(&p.token, ActivityId::new(p.id)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "ReviewOff" => {
            let p = params!(ActivityIdParams);
            match engine.review_off(&p.token, ActivityId::new(p.id)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "GetActivityDigest" => {
            let p = params!(TokenParams);
            match engine.digest(&p.token) {
                Ok(digest) => RpcResponse::ok(
                    id,
                    DigestReply {
                        activity: FlatActivityDigest::from(&digest),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Push" => {
            let p = params!(PushParams);
            match engine.push(&p.token, &p.kind, &p.attr) {
                Ok(labeled) => RpcResponse::ok(
                    id,
                    CommentReply {
                        comment: FlatComment::from(&labeled),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Review" => {
            let p = params!(TokenParams);
            match engine.review(&p.token) {
                Ok(batch) => RpcResponse::ok(
                    id,
                    CommentsReply {
                        comments: flatten_comments(&batch),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Approve" => {
            let p = params!(IdsParams);
            match engine.approve(&p.token, &comment_ids(&p.ids)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Deny" => {
            let p = params!(IdsParams);
            match engine.deny(&p.token, &comment_ids(&p.ids)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Display" => {
            let p = params!(TokenParams);
            match engine.display(&p.token) {
                Ok(batch) => RpcResponse::ok(
                    id,
                    CommentsReply {
                        comments: flatten_comments(&batch),
                    },
                ),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        "Reset" => {
            let p = params!(ActivityIdParams);
            match engine.reset(&p.token, ActivityId::new(p.id)) {
                Ok(()) => RpcResponse::ok(id, EmptyReply {}),
                Err(e) => RpcResponse::err(id, e),
            }
        }
        other => {
            tracing::debug!(method = other, "unknown rpc method");
            RpcResponse::err(id, "method not found")
        }
    }
}

//! HTTP router
//!
//! A single JSON-RPC endpoint at `/` plus a health probe. CORS is wide
//! open: display clients are browser overlays served from anywhere.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use barrage_engine::Engine;

use crate::rpc::{dispatch, RpcRequest, RpcResponse};

/// Build the application router around a shared engine
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn rpc_handler(
    State(engine): State<Arc<Engine>>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    tracing::debug!(method = %request.method, "rpc call");
    Json(dispatch(&engine, request))
}

async fn health_handler() -> &'static str {
    "ok"
}

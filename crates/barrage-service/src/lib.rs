//! Barrage Service - RPC boundary
//!
//! Translates JSON-RPC calls into engine operations and flattens the
//! engine's structures into wire-format replies. The core contract lives
//! in `barrage-engine`; nothing here holds state beyond the shared engine.

pub mod router;
pub mod rpc;
pub mod wire;

pub use router::*;
pub use rpc::*;
pub use wire::*;

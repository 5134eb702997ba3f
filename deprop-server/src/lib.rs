//! HTTP/JSON façade over the deprop propagation engine.
//!
//! One endpoint, `POST /api/deprecate`, takes `{projectPath, methodName,
//! methodSignature?}` and answers with the engine's result JSON. Runs on the
//! same project root are serialized by [`gate::RootGate`]; the engine itself
//! runs on the blocking pool.

pub mod error;
pub mod gate;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod settings;
pub mod state;

//! Shared application state.

use std::sync::Arc;

use crate::gate::RootGate;

/// State handed to every handler.
///
/// The engine holds no state between runs, so the only shared piece is the
/// per-root gate.
#[derive(Clone, Default)]
pub struct AppState {
    pub gate: Arc<RootGate>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

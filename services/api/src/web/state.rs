//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use crate::providers::Providers;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub providers: Providers,
}

impl AppState {
    pub fn new(providers: Providers) -> Arc<Self> {
        Arc::new(Self { providers })
    }
}

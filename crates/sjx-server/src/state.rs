//! # Application State
//!
//! Shared by all request handlers via `Arc`. The selection engine itself is not
//! shared: every request builds its own [`SemiJoinSearch`](sjx_core::search::SemiJoinSearch)
//! from the configuration it carries, so handlers never contend on engine state.

/// Server-level limits applied to every request.
pub struct ServerConfig {
    /// Requests asking for more rounds than this are rejected.
    pub max_rounds_limit: usize,
    /// Requests with more relations than this are rejected.
    pub max_relations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_rounds_limit: 1_000,
            max_relations: 256,
        }
    }
}

/// Shared application state, accessible by all request handlers via Axum's State extractor.
#[derive(Default)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

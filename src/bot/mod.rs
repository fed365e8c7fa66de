//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: commands and free text, routed by session state
//! - `callback_handler`: inline keyboard taps, validated at the boundary
//! - `navigation`: the tier-parameterized catalog drill-down engine
//! - `form`: the ordered field-collection pipeline for requests
//! - `admin`: identity-gated pending list and respond sub-flow
//! - `search`: catalog full-text search for idle free text
//! - `payload`: button payload codec
//! - `ui_builder`: render instructions, keyboards and the transport adapter

pub mod admin;
pub mod callback_handler;
pub mod form;
pub mod message_handler;
pub mod navigation;
pub mod payload;
pub mod search;
pub mod ui_builder;

use std::sync::Arc;

use crate::catalog::CatalogApi;
use crate::config::Config;
use crate::requests::RequestStoreApi;
use crate::session::SessionStore;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// Shared dependencies for the dispatcher: configuration, the two external
/// service clients and the per-user session store.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn CatalogApi>,
    pub store: Arc<dyn RequestStoreApi>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn RequestStoreApi>,
    ) -> Self {
        Self {
            config,
            catalog,
            store,
            sessions: SessionStore::new(),
        }
    }
}

//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the layout store, the component registry used for server-side
//! rendering, and the per-thread conversation log the query gate reads.

use std::sync::Arc;

use crate::agent::LayoutSource;
use crate::layout::ComponentRegistry;
use crate::session::ConversationLog;
use crate::store::LayoutStore;

/// Clone is required by Axum; every field is shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LayoutStore>,
    pub registry: &'static ComponentRegistry,
    pub conversations: Arc<ConversationLog>,
}

impl AppState {
    /// State backed by `source` and the process-wide default registry.
    #[must_use]
    pub fn new(source: Arc<dyn LayoutSource>) -> Self {
        Self {
            store: Arc::new(LayoutStore::new(source)),
            registry: ComponentRegistry::global(),
            conversations: Arc::new(ConversationLog::new()),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

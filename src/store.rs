//! Layout store: memoized layout fetches keyed by normalized markdown.
//!
//! DESIGN
//! ======
//! `LayoutStore` is an explicit service object, built once by the host and
//! shared by `Arc`. It owns the ordered entry list, the set of in-flight
//! keys, and the last fetch error.
//!
//! - A key is the trimmed markdown text. A cached key never reaches the
//!   layout source again unless it is invalidated.
//! - Concurrent fetches for the same key are coalesced: the first caller
//!   fetches, later callers wait on a broadcast of its outcome.
//! - Failures set `last_error` and never touch cached entries.
//!
//! TRADE-OFFS
//! ==========
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`. If the fetching caller is dropped mid-flight, its guard clears
//! the pending key so waiters see an error instead of hanging.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::agent::{GeneratedLayout, LayoutSource};
use crate::layout::{LayoutDocument, LayoutError};

const MAX_TITLE_CHARS: usize = 80;
const UNTITLED: &str = "Untitled layout";

type FetchOutcome = Result<LayoutEntry, LayoutError>;

// =============================================================================
// TYPES
// =============================================================================

/// One cached layout. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEntry {
    pub key: String,
    pub data: LayoutDocument,
    pub title: String,
}

impl LayoutEntry {
    fn from_generated(key: &str, generated: GeneratedLayout) -> Self {
        let title = generated.title.unwrap_or_else(|| derive_title(key));
        Self { key: key.to_string(), data: generated.document, title }
    }
}

/// Point-in-time view of the store for observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub entries: Vec<LayoutEntry>,
    pub is_loading: bool,
    pub pending_keys: Vec<String>,
    pub error: Option<String>,
}

struct StoreInner {
    /// Arrival order; at most one entry per key.
    entries: Vec<LayoutEntry>,
    /// In-flight keys → channel announcing the outcome to coalesced waiters.
    pending: HashMap<String, broadcast::Sender<FetchOutcome>>,
    last_error: Option<LayoutError>,
}

// =============================================================================
// STORE
// =============================================================================

pub struct LayoutStore {
    source: Arc<dyn LayoutSource>,
    inner: Mutex<StoreInner>,
}

/// Normalize markdown into a cache key.
#[must_use]
pub fn normalize_key(markdown: &str) -> &str {
    markdown.trim()
}

impl LayoutStore {
    #[must_use]
    pub fn new(source: Arc<dyn LayoutSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(StoreInner { entries: Vec::new(), pending: HashMap::new(), last_error: None }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached layout for `markdown`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidKey`] for blank markdown, or the layout
    /// source's error. Errors are also recorded as `last_error`.
    pub async fn fetch_layout(&self, markdown: &str) -> Result<LayoutEntry, LayoutError> {
        let key = normalize_key(markdown);
        if key.is_empty() {
            return Err(LayoutError::InvalidKey("markdown is empty".into()));
        }

        let waiter = {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.iter().find(|e| e.key == key) {
                debug!(key_len = key.len(), "layout cache hit");
                return Ok(entry.clone());
            }
            if let Some(tx) = inner.pending.get(key) {
                Some(tx.subscribe())
            } else {
                let (tx, _) = broadcast::channel(1);
                inner.pending.insert(key.to_string(), tx);
                inner.last_error = None;
                None
            }
        };

        if let Some(mut rx) = waiter {
            debug!(key_len = key.len(), "layout fetch coalesced with pending request");
            return rx
                .recv()
                .await
                .unwrap_or_else(|_| Err(LayoutError::Fetch("pending layout fetch was abandoned".into())));
        }

        let guard = PendingFetch { store: self, key, done: false };
        info!(key_len = key.len(), "layout fetch started");
        let outcome = self
            .source
            .generate(key)
            .await
            .map(|generated| LayoutEntry::from_generated(key, generated));
        guard.complete(&outcome);
        outcome
    }

    /// All cached entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> Vec<LayoutEntry> {
        self.lock().entries.clone()
    }

    /// Cached entry for `markdown`, if any. Never fetches.
    #[must_use]
    pub fn get(&self, markdown: &str) -> Option<LayoutEntry> {
        let key = normalize_key(markdown);
        self.lock()
            .entries
            .iter()
            .find(|e| e.key == key)
            .cloned()
    }

    /// `true` while any fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    /// Keys currently being fetched, sorted.
    #[must_use]
    pub fn pending_keys(&self) -> Vec<String> {
        sorted_keys(&self.lock().pending)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<LayoutError> {
        self.lock().last_error.clone()
    }

    /// Drop the cached entry for `markdown` so the next fetch hits the source.
    /// Returns whether an entry was removed.
    pub fn invalidate(&self, markdown: &str) -> bool {
        let key = normalize_key(markdown);
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.key != key);
        let removed = inner.entries.len() != before;
        if removed {
            info!(key_len = key.len(), "layout invalidated");
        }
        removed
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.lock();
        StoreSnapshot {
            entries: inner.entries.clone(),
            is_loading: !inner.pending.is_empty(),
            pending_keys: sorted_keys(&inner.pending),
            error: inner.last_error.as_ref().map(ToString::to_string),
        }
    }
}

// =============================================================================
// PENDING FETCH GUARD
// =============================================================================

/// Owns a key's pending slot for the duration of one fetch.
struct PendingFetch<'a> {
    store: &'a LayoutStore,
    key: &'a str,
    done: bool,
}

impl PendingFetch<'_> {
    /// Record the outcome, release the pending slot and wake coalesced waiters.
    fn complete(mut self, outcome: &FetchOutcome) {
        let mut inner = self.store.lock();
        match outcome {
            Ok(entry) => {
                inner.entries.retain(|e| e.key != entry.key);
                inner.entries.push(entry.clone());
                info!(
                    key_len = self.key.len(),
                    components = entry.data.component_count(),
                    entries = inner.entries.len(),
                    "layout fetch succeeded"
                );
            }
            Err(e) => {
                warn!(key_len = self.key.len(), error = %e, "layout fetch failed");
                inner.last_error = Some(e.clone());
            }
        }
        if let Some(tx) = inner.pending.remove(self.key) {
            // No receivers is fine: nobody coalesced onto this fetch.
            let _ = tx.send(outcome.clone());
        }
        self.done = true;
        drop(inner);
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if !self.done {
            warn!(key_len = self.key.len(), "layout fetch abandoned before completion");
            self.store.lock().pending.remove(self.key);
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn sorted_keys(pending: &HashMap<String, broadcast::Sender<FetchOutcome>>) -> Vec<String> {
    let mut keys: Vec<String> = pending.keys().cloned().collect();
    keys.sort_unstable();
    keys
}

/// Title from the first non-empty markdown line, heading markers stripped.
#[must_use]
pub fn derive_title(markdown: &str) -> String {
    let line = markdown
        .lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty());
    let Some(line) = line else {
        return UNTITLED.to_string();
    };
    if line.chars().count() <= MAX_TITLE_CHARS {
        return line.to_string();
    }
    let mut title: String = line.chars().take(MAX_TITLE_CHARS - 1).collect();
    title.push('…');
    title
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

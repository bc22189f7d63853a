//! Chat session attributes and the in-memory conversation log.
//!
//! DESIGN
//! ======
//! `SessionAttributes` arrive with every query and are consumed, not owned.
//! `ConversationLog` keeps the ordered messages of each thread so the query
//! gate can tell a thread's first user message from the rest. It holds no
//! state beyond the process lifetime.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::Scope;

// =============================================================================
// SESSION ATTRIBUTES
// =============================================================================

/// Context ids the caller knows about for the current conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medspa_id: Option<String>,
    #[serde(default)]
    pub conversation_scope: Scope,
    pub thread_id: String,
}

impl SessionAttributes {
    /// Active patient id, ignoring blank values.
    #[must_use]
    pub fn active_patient(&self) -> Option<&str> {
        non_blank(self.active_patient_id.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub thread_id: String,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(thread_id: &str, content: &str) -> Self {
        Self { id: Uuid::new_v4(), thread_id: thread_id.to_string(), role: Role::User, content: content.to_string() }
    }

    #[must_use]
    pub fn assistant(thread_id: &str, content: &str) -> Self {
        Self { role: Role::Assistant, ..Self::user(thread_id, content) }
    }
}

// =============================================================================
// CONVERSATION LOG
// =============================================================================

/// Ordered messages per thread id.
#[derive(Default)]
pub struct ConversationLog {
    threads: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<ChatMessage>>> {
        self.threads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, message: ChatMessage) {
        self.lock()
            .entry(message.thread_id.clone())
            .or_default()
            .push(message);
    }

    /// Messages of one thread in append order.
    #[must_use]
    pub fn history(&self, thread_id: &str) -> Vec<ChatMessage> {
        self.lock().get(thread_id).cloned().unwrap_or_default()
    }

    /// Forget a thread. Returns the number of messages dropped.
    pub fn clear_thread(&self, thread_id: &str) -> usize {
        self.lock().remove(thread_id).map_or(0, |m| m.len())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

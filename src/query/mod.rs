//! Query gate. Decides whether a chat query may proceed.
//!
//! DESIGN
//! ======
//! Two outcomes per turn:
//! - `REQUEST_PATIENT_SELECTION`: the query needs a patient and the session
//!   has none, or the query names a patient id other than the active one.
//!   Terminal for this turn; the caller re-submits once the right patient
//!   is selected. Never carries an enhanced query.
//! - `PROCEED`: the query may be forwarded, enhanced with context ids when
//!   it is the thread's first user message.
//!
//! Everything here is synchronous and pure given its inputs. Retries belong
//! to the caller.

pub mod classify;
pub mod enhance;

pub use classify::{ClassificationResult, Scope, classify_query, mentioned_patient_ids};
pub use enhance::{ContextIds, enhance_query, should_enhance_query};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::{ChatMessage, SessionAttributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Proceed,
    RequestPatientSelection,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "PROCEED",
            Self::RequestPatientSelection => "REQUEST_PATIENT_SELECTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDecision {
    pub action: Action,
    pub classification: ClassificationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_query: Option<String>,
}

impl QueryDecision {
    #[must_use]
    pub fn proceeds(&self) -> bool {
        self.action == Action::Proceed
    }

    /// Text to forward downstream: the enhanced query when present.
    #[must_use]
    pub fn forwarded_text<'a>(&'a self, original: &'a str) -> &'a str {
        self.enhanced_query.as_deref().unwrap_or(original)
    }
}

/// Classify `text` and gate it against the session.
///
/// `history` is the prior message list used for first-message detection.
#[must_use]
pub fn evaluate_query(text: &str, session: &SessionAttributes, history: &[ChatMessage]) -> QueryDecision {
    let thread_id = session.thread_id.as_str();
    let classification = classify_query(text, Some(thread_id));

    let mismatch = names_other_patient(text, session.active_patient());
    let needs_selection = classification.requires_patient && (session.active_patient().is_none() || mismatch);

    let decision = if needs_selection {
        QueryDecision { action: Action::RequestPatientSelection, classification, enhanced_query: None }
    } else {
        let enhanced_query = if should_enhance_query(history, thread_id) {
            enhance_query(text, &classification, &ContextIds::from_session(session))
        } else {
            None
        };
        QueryDecision { action: Action::Proceed, classification, enhanced_query }
    };

    info!(
        thread_id,
        action = decision.action.as_str(),
        scope = classification.scope.as_str(),
        enhanced = decision.enhanced_query.is_some(),
        patient_mismatch = mismatch,
        "query evaluated"
    );
    decision
}

/// `true` when `text` names patient ids and none of them is `active`.
fn names_other_patient(text: &str, active: Option<&str>) -> bool {
    let Some(active) = active else {
        return false;
    };
    let ids = mentioned_patient_ids(text);
    !ids.is_empty() && !ids.iter().any(|id| id.eq_ignore_ascii_case(active))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! First-message context injection.
//!
//! The first user message of a thread is prefixed with the ids the session
//! already knows, so downstream agents get a fully scoped request without the
//! user restating it. Later messages pass through untouched.

use crate::query::{ClassificationResult, Scope};
use crate::session::{ChatMessage, Role, SessionAttributes, non_blank};

const CONTEXT_HEADER: &str = "[Context]";

/// Ids available for injection. Blank values count as unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextIds<'a> {
    pub provider_id: Option<&'a str>,
    pub medspa_id: Option<&'a str>,
    pub patient_id: Option<&'a str>,
}

impl<'a> ContextIds<'a> {
    #[must_use]
    pub fn from_session(session: &'a SessionAttributes) -> Self {
        Self {
            provider_id: non_blank(session.provider_id.as_deref()),
            medspa_id: non_blank(session.medspa_id.as_deref()),
            patient_id: session.active_patient(),
        }
    }
}

/// `true` when `thread_id` has no prior user message in `history`.
#[must_use]
pub fn should_enhance_query(history: &[ChatMessage], thread_id: &str) -> bool {
    !history
        .iter()
        .any(|m| m.role == Role::User && m.thread_id == thread_id)
}

/// Prefix `text` with a context block naming the known ids.
///
/// The patient id is included only for patient-scoped queries. Returns
/// `None` when no id applies. The original text is kept intact after the
/// block.
#[must_use]
pub fn enhance_query(text: &str, classification: &ClassificationResult, ids: &ContextIds<'_>) -> Option<String> {
    let patient_id = ids.patient_id.filter(|_| classification.scope == Scope::Patient);
    let lines: Vec<String> = [("Provider ID", ids.provider_id), ("Medspa ID", ids.medspa_id), ("Patient ID", patient_id)]
        .into_iter()
        .filter_map(|(label, id)| non_blank(id).map(|id| format!("{label}: {id}")))
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut out = String::from(CONTEXT_HEADER);
    out.push('\n');
    out.push_str(&format!("Scope: {}\n", classification.scope.as_str()));
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(text);
    Some(out)
}

#[cfg(test)]
#[path = "enhance_test.rs"]
mod tests;

//! Chat query gate route.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::query::{QueryDecision, evaluate_query};
use crate::session::{ChatMessage, SessionAttributes};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub text: String,
    pub session: SessionAttributes,
}

#[derive(Debug, Serialize)]
pub struct ClearThreadResponse {
    pub removed: usize,
}

/// `POST /api/chat/query`: classify a query and decide whether it proceeds.
///
/// A proceeding query is appended to its thread as forwarded downstream, so
/// only the first one is enhanced. A blocked query is not recorded; the
/// caller re-submits it once a patient is selected.
pub async fn query(State(state): State<AppState>, Json(body): Json<QueryBody>) -> Json<QueryDecision> {
    let thread_id = body.session.thread_id.as_str();
    let history = state.conversations.history(thread_id);
    let decision = evaluate_query(&body.text, &body.session, &history);

    if decision.proceeds() {
        state
            .conversations
            .append(ChatMessage::user(thread_id, decision.forwarded_text(&body.text)));
    }
    Json(decision)
}

/// `DELETE /api/chat/threads/{thread_id}`: forget a thread so its next query
/// counts as the first one again.
pub async fn clear_thread(State(state): State<AppState>, Path(thread_id): Path<String>) -> Json<ClearThreadResponse> {
    Json(ClearThreadResponse { removed: state.conversations.clear_thread(&thread_id) })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host exposes the query gate and the layout pipeline as JSON endpoints
//! under `/api`. Failures come back as `{code, message, retryable}` with a
//! status mapped from the error variant.

pub mod chat;
pub mod layouts;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorBody, ErrorCode};
use crate::layout::LayoutError;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat/query", post(chat::query))
        .route("/api/chat/threads/{thread_id}", delete(chat::clear_thread))
        .route("/api/layouts", get(layouts::list_layouts).post(layouts::fetch_layout))
        .route("/api/layouts/invalidate", post(layouts::invalidate_layout))
        .route("/api/layouts/render", post(layouts::render_layout))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error response: HTTP status plus structured body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &impl ErrorCode) -> Self {
        Self { status, body: ErrorBody::from_error(err) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<LayoutError> for ApiError {
    fn from(err: LayoutError) -> Self {
        Self::new(layout_error_to_status(&err), &err)
    }
}

pub(crate) fn layout_error_to_status(err: &LayoutError) -> StatusCode {
    match err {
        LayoutError::InvalidKey(_) => StatusCode::BAD_REQUEST,
        LayoutError::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LayoutError::Fetch(_) | LayoutError::ServiceStatus { .. } | LayoutError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        LayoutError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

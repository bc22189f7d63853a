//! Layout store and renderer routes.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::layout::{self, RenderNode};
use crate::state::AppState;
use crate::store::{LayoutEntry, StoreSnapshot};

#[derive(Debug, Deserialize)]
pub struct MarkdownBody {
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    pub layout: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub tree: RenderNode,
    pub html: String,
}

/// `POST /api/layouts`: return the cached layout for markdown, fetching on miss.
pub async fn fetch_layout(
    State(state): State<AppState>,
    Json(body): Json<MarkdownBody>,
) -> Result<Json<LayoutEntry>, ApiError> {
    let entry = state.store.fetch_layout(&body.markdown).await?;
    Ok(Json(entry))
}

/// `GET /api/layouts`: cached entries plus loading and error flags.
pub async fn list_layouts(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(state.store.snapshot())
}

/// `POST /api/layouts/invalidate`: drop one cached entry.
pub async fn invalidate_layout(
    State(state): State<AppState>,
    Json(body): Json<MarkdownBody>,
) -> Json<InvalidateResponse> {
    Json(InvalidateResponse { removed: state.store.invalidate(&body.markdown) })
}

/// `POST /api/layouts/render`: validate and render a layout document.
pub async fn render_layout(
    State(state): State<AppState>,
    Json(body): Json<RenderBody>,
) -> Result<Json<RenderResponse>, ApiError> {
    let tree = layout::render_value(body.layout, state.registry)?;
    let html = tree.to_html();
    Ok(Json(RenderResponse { tree, html }))
}

#[cfg(test)]
#[path = "layouts_test.rs"]
mod tests;

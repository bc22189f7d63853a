//! Agent-generated card layouts: AST, component registry and renderer.
//!
//! DESIGN
//! ======
//! An upstream agent turns markdown into a `LayoutDocument`: grids of rows of
//! named components with JSON props. The renderer walks the document and
//! resolves each name against a [`ComponentRegistry`] at render time, so new
//! names emitted by the agent degrade to a visible fallback instead of
//! failing the whole document.
//!
//! Render keys are structural (`g0-r1-c2`), never random, so the same
//! document always yields the same tree.

pub mod ast;
pub mod components;
pub mod element;
pub mod registry;
pub mod render;

pub use ast::{ComponentRef, GridSection, LayoutDocument, Props, RowSection};
pub use element::Element;
pub use registry::{Component, ComponentRegistry};
pub use render::{RenderNode, render_layout, render_value};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while validating, fetching or decoding layouts.
///
/// `Clone` so a single fetch outcome can be handed to every coalesced waiter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The document does not have the layout shape.
    #[error("invalid layout document: {0}")]
    InvalidDocument(String),

    /// The markdown key is unusable (empty after trimming).
    #[error("invalid layout key: {0}")]
    InvalidKey(String),

    /// The request to the layout service did not complete.
    #[error("layout request failed: {0}")]
    Fetch(String),

    /// The layout service answered with a non-success status.
    #[error("layout service returned status {status}")]
    ServiceStatus { status: u16, body: String },

    /// The response body was not a layout object.
    #[error("malformed layout response for key '{key}': {reason}")]
    MalformedResponse { key: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LayoutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDocument(_) => "E_INVALID_LAYOUT",
            Self::InvalidKey(_) => "E_INVALID_LAYOUT_KEY",
            Self::Fetch(_) => "E_LAYOUT_FETCH",
            Self::ServiceStatus { .. } => "E_LAYOUT_SERVICE_STATUS",
            Self::MalformedResponse { .. } => "E_LAYOUT_MALFORMED_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::ServiceStatus { status: 429 | 500..=599, .. })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

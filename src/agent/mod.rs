//! Layout source: the seam to the external layout-generation agent.
//!
//! DESIGN
//! ======
//! The store only knows the [`LayoutSource`] trait, so tests swap in a mock
//! and the host wires [`http::HttpLayoutSource`]. Response decoding is a pure
//! function so every accepted wire shape is testable without a server.
//!
//! Accepted response bodies:
//! - a layout object
//! - a JSON string whose contents parse into a layout object
//! - `{ "layout": <either of the above>, "title"?: string }`

pub mod config;
pub mod http;

use serde_json::Value;

use crate::layout::{LayoutDocument, LayoutError};

/// A decoded layout plus the title the service suggested, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLayout {
    pub document: LayoutDocument,
    pub title: Option<String>,
}

/// Async source of layouts keyed by normalized markdown. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LayoutSource: Send + Sync {
    /// Generate the layout for `key` (already trimmed).
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the request fails or the response is not a
    /// layout document.
    async fn generate(&self, key: &str) -> Result<GeneratedLayout, LayoutError>;
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a raw response body for `key`.
///
/// # Errors
///
/// Returns [`LayoutError::MalformedResponse`] naming `key` when the body is
/// not JSON, is not an object after unwrapping, or fails document validation.
pub fn decode_response(key: &str, body: &str) -> Result<GeneratedLayout, LayoutError> {
    let malformed = |reason: String| LayoutError::MalformedResponse { key: key.to_string(), reason };

    let root = parse_json(body).map_err(malformed)?;
    let root = unwrap_string(root).map_err(malformed)?;

    let (layout, title) = match root {
        Value::Object(mut obj) if !obj.contains_key("grids") && obj.contains_key("layout") => {
            let title = obj
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            let layout = obj.remove("layout").unwrap_or(Value::Null);
            (unwrap_string(layout).map_err(malformed)?, title)
        }
        other => (other, None),
    };

    if !layout.is_object() {
        return Err(malformed(format!("expected a JSON object, got {}", json_kind(&layout))));
    }

    let document = LayoutDocument::from_value(layout).map_err(|e| malformed(e.to_string()))?;
    Ok(GeneratedLayout { document, title })
}

fn parse_json(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| format!("not JSON: {e}"))
}

/// Agents sometimes double-encode: a string body holding the JSON document.
fn unwrap_string(value: Value) -> Result<Value, String> {
    match value {
        Value::String(s) => parse_json(&s),
        other => Ok(other),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! AST types for agent-generated card layouts.
//!
//! The document is untyped data coming from an external agent: component
//! names are plain strings resolved against the registry at render time.

use serde::{Deserialize, Serialize};

use super::LayoutError;

/// Tag value every layout document must carry.
pub const LAYOUT_KIND: &str = "Layout";

/// Props handed verbatim to a component.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// A full layout: grids stacked vertically in array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(alias = "type")]
    pub kind: String,
    pub grids: Vec<GridSection>,
}

/// A grid container. `columns` and `gap` are layout hints for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    pub columns: u32,
    pub gap: f64,
    pub rows: Vec<RowSection>,
}

/// A row of components, placed left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSection {
    pub components: Vec<ComponentRef>,
}

/// A reference to a registry component by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub name: String,
    #[serde(default)]
    pub props: Props,
}

impl LayoutDocument {
    /// Parse and validate a document from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDocument`] when the value does not have the
    /// document shape (missing `grids`, `rows` or `components`, wrong types) or
    /// fails [`LayoutDocument::validate`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, LayoutError> {
        let doc: Self = serde_json::from_value(value).map_err(|e| LayoutError::InvalidDocument(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDocument`] naming the first offending grid.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.kind != LAYOUT_KIND {
            return Err(LayoutError::InvalidDocument(format!(
                "expected kind '{LAYOUT_KIND}', got '{}'",
                self.kind
            )));
        }
        for (i, grid) in self.grids.iter().enumerate() {
            if grid.columns == 0 {
                return Err(LayoutError::InvalidDocument(format!("grid {i}: columns must be positive")));
            }
            if !grid.gap.is_finite() || grid.gap < 0.0 {
                return Err(LayoutError::InvalidDocument(format!(
                    "grid {i}: gap must be a non-negative number, got {}",
                    grid.gap
                )));
            }
        }
        Ok(())
    }

    /// Total number of component slots across all grids and rows.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.grids
            .iter()
            .flat_map(|g| &g.rows)
            .map(|r| r.components.len())
            .sum()
    }
}

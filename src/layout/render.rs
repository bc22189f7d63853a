//! Renderer: converts a layout document into a render tree.
//!
//! Order is load-bearing: grid position is inferred from array index, so
//! the tree mirrors the document exactly (grids, then rows, then components).

use std::fmt::Write;

use serde::Serialize;

use super::ast::{ComponentRef, GridSection, LayoutDocument, Props, RowSection};
use super::element::{write_html, write_open_tag};
use super::registry::ComponentRegistry;
use super::{Element, LayoutError};

/// CSS length of one gap unit (matches a 4px spacing scale).
const GAP_UNIT_REM: f64 = 0.25;

/// A node of the rendered layout tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderNode {
    /// Document root; children are grids in vertical order.
    Layout { children: Vec<RenderNode> },
    Grid { key: String, columns: u32, gap: f64, children: Vec<RenderNode> },
    Row { key: String, children: Vec<RenderNode> },
    /// A resolved component and the element tree it produced.
    Component { key: String, name: String, props: Props, body: Element },
    /// Placeholder for a name the registry does not know.
    Fallback { key: String, name: String },
}

/// Validate and render a typed document.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidDocument`] if the document fails validation.
/// Unknown component names are not errors.
pub fn render_layout(doc: &LayoutDocument, registry: &ComponentRegistry) -> Result<RenderNode, LayoutError> {
    doc.validate()?;
    let children = doc
        .grids
        .iter()
        .enumerate()
        .map(|(gi, grid)| render_grid(gi, grid, registry))
        .collect();
    Ok(RenderNode::Layout { children })
}

/// Parse, validate and render an untyped JSON document.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidDocument`] for a malformed document.
pub fn render_value(value: serde_json::Value, registry: &ComponentRegistry) -> Result<RenderNode, LayoutError> {
    let doc = LayoutDocument::from_value(value)?;
    render_layout(&doc, registry)
}

fn render_grid(gi: usize, grid: &GridSection, registry: &ComponentRegistry) -> RenderNode {
    let key = format!("g{gi}");
    let children = grid
        .rows
        .iter()
        .enumerate()
        .map(|(ri, row)| render_row(&key, ri, row, registry))
        .collect();
    RenderNode::Grid { key, columns: grid.columns, gap: grid.gap, children }
}

fn render_row(grid_key: &str, ri: usize, row: &RowSection, registry: &ComponentRegistry) -> RenderNode {
    let key = format!("{grid_key}-r{ri}");
    let children = row
        .components
        .iter()
        .enumerate()
        .map(|(ci, component)| render_component(&key, ci, component, registry))
        .collect();
    RenderNode::Row { key, children }
}

fn render_component(row_key: &str, ci: usize, component: &ComponentRef, registry: &ComponentRegistry) -> RenderNode {
    let key = format!("{row_key}-c{ci}");
    match registry.resolve(&component.name) {
        Some(c) => RenderNode::Component {
            key,
            name: component.name.clone(),
            props: component.props.clone(),
            body: c.render(&component.props),
        },
        None => RenderNode::Fallback { key, name: component.name.clone() },
    }
}

// =============================================================================
// TREE QUERIES
// =============================================================================

impl RenderNode {
    /// Structural key; the root has none.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Layout { .. } => None,
            Self::Grid { key, .. } | Self::Row { key, .. } | Self::Component { key, .. } | Self::Fallback { key, .. } => {
                Some(key.as_str())
            }
        }
    }

    #[must_use]
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Layout { children } | Self::Grid { children, .. } | Self::Row { children, .. } => children,
            Self::Component { .. } | Self::Fallback { .. } => &[],
        }
    }

    /// Component slots (resolved and fallback) in render order.
    #[must_use]
    pub fn slots(&self) -> Vec<&RenderNode> {
        let mut out = Vec::new();
        collect_slots(self, &mut out);
        out
    }

    /// Names of every slot in render order, fallbacks included.
    #[must_use]
    pub fn component_names(&self) -> Vec<&str> {
        self.slots()
            .into_iter()
            .filter_map(|n| match n {
                Self::Component { name, .. } | Self::Fallback { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names that rendered as fallbacks, in render order.
    #[must_use]
    pub fn fallback_names(&self) -> Vec<&str> {
        self.slots()
            .into_iter()
            .filter_map(|n| match n {
                Self::Fallback { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialize the tree to HTML for server-side rendering.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

fn collect_slots<'a>(node: &'a RenderNode, out: &mut Vec<&'a RenderNode>) {
    match node {
        RenderNode::Component { .. } | RenderNode::Fallback { .. } => out.push(node),
        _ => {
            for c in node.children() {
                collect_slots(c, out);
            }
        }
    }
}

fn write_node(node: &RenderNode, out: &mut String) {
    match node {
        RenderNode::Layout { children } => {
            write_open_tag(out, "div", &[("class", "layout".to_string())]);
            write_children(children, out);
            out.push_str("</div>");
        }
        RenderNode::Grid { key, columns, gap, children } => {
            let mut style = String::new();
            let _ = write!(
                style,
                "display:grid;grid-template-columns:repeat({columns},minmax(0,1fr));gap:{}rem",
                gap * GAP_UNIT_REM
            );
            write_open_tag(out, "div", &[("class", "layout-grid".to_string()), ("data-key", key.clone()), ("style", style)]);
            write_children(children, out);
            out.push_str("</div>");
        }
        RenderNode::Row { key, children } => {
            write_open_tag(
                out,
                "div",
                &[("class", "layout-row".to_string()), ("data-key", key.clone()), ("style", "display:contents".to_string())],
            );
            write_children(children, out);
            out.push_str("</div>");
        }
        RenderNode::Component { key, name, body, .. } => {
            write_open_tag(
                out,
                "div",
                &[("class", "layout-slot".to_string()), ("data-key", key.clone()), ("data-component", name.clone())],
            );
            write_html(body, out);
            out.push_str("</div>");
        }
        RenderNode::Fallback { key, name } => {
            let placeholder = Element::node("div")
                .attr("class", "layout-slot layout-fallback")
                .attr("data-key", key.clone())
                .attr("data-component", name.clone())
                .attr("role", "alert")
                .child(Element::text(format!("Unknown component: {name}")));
            write_html(&placeholder, out);
        }
    }
}

fn write_children(children: &[RenderNode], out: &mut String) {
    for c in children {
        write_node(c, out);
    }
}

//! Tests for the layout AST, registry and renderer.

use serde_json::json;

use super::components::{METRIC_CARD, TEXT_CARD, USER_HISTORY_CARD};
use super::*;
use crate::error::ErrorCode;

fn doc(value: serde_json::Value) -> LayoutDocument {
    LayoutDocument::from_value(value).unwrap()
}

// =============================================================================
// AST
// =============================================================================

#[test]
fn parse_minimal_document() {
    let d = doc(json!({ "kind": "Layout", "grids": [] }));
    assert_eq!(d.kind, "Layout");
    assert!(d.grids.is_empty());
    assert_eq!(d.component_count(), 0);
}

#[test]
fn parse_accepts_type_alias_for_kind() {
    let d = doc(json!({ "type": "Layout", "grids": [] }));
    assert_eq!(d.kind, "Layout");
}

#[test]
fn parse_defaults_missing_props() {
    let d = doc(json!({
        "kind": "Layout",
        "grids": [{ "columns": 1, "gap": 0, "rows": [{ "components": [{ "name": "TextCard" }] }] }]
    }));
    assert!(d.grids[0].rows[0].components[0].props.is_empty());
}

#[test]
fn parse_missing_grids_is_invalid() {
    let err = LayoutDocument::from_value(json!({ "kind": "Layout" })).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDocument(ref m) if m.contains("grids")));
}

#[test]
fn parse_missing_rows_is_invalid() {
    let err = LayoutDocument::from_value(json!({ "kind": "Layout", "grids": [{ "columns": 2, "gap": 4 }] }))
        .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDocument(ref m) if m.contains("rows")));
}

#[test]
fn parse_missing_components_is_invalid() {
    let err = LayoutDocument::from_value(json!({
        "kind": "Layout",
        "grids": [{ "columns": 2, "gap": 4, "rows": [{}] }]
    }))
    .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDocument(ref m) if m.contains("components")));
}

#[test]
fn parse_wrong_kind_is_invalid() {
    let err = LayoutDocument::from_value(json!({ "kind": "Page", "grids": [] })).unwrap_err();
    assert!(err.to_string().contains("expected kind 'Layout'"));
}

#[test]
fn parse_zero_columns_is_invalid() {
    let err = LayoutDocument::from_value(json!({
        "kind": "Layout",
        "grids": [{ "columns": 0, "gap": 4, "rows": [] }]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("columns must be positive"));
}

#[test]
fn parse_negative_gap_is_invalid() {
    let err = LayoutDocument::from_value(json!({
        "kind": "Layout",
        "grids": [{ "columns": 2, "gap": -1, "rows": [] }]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("gap must be a non-negative number"));
}

#[test]
fn parse_non_object_is_invalid() {
    let err = LayoutDocument::from_value(json!("Layout")).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidDocument(_)));
}

// =============================================================================
// REGISTRY
// =============================================================================

#[test]
fn empty_registry_resolves_nothing() {
    let registry = ComponentRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.resolve(TEXT_CARD).is_none());
}

#[test]
fn default_registry_knows_built_ins() {
    let registry = ComponentRegistry::with_defaults();
    assert!(registry.contains(USER_HISTORY_CARD));
    assert!(registry.resolve("DoesNotExist").is_none());
    assert_eq!(registry.len(), registry.names().len());
}

#[test]
fn global_registry_is_shared() {
    let a = ComponentRegistry::global();
    let b = ComponentRegistry::global();
    assert!(std::ptr::eq(a, b));
    assert!(a.contains(METRIC_CARD));
}

#[test]
fn register_closure_component() {
    let registry = ComponentRegistry::new().register("Badge", |props: &Props| {
        let label = props.get("label").and_then(|v| v.as_str()).unwrap_or("");
        Element::node("span").child(Element::text(label))
    });
    let mut props = Props::new();
    props.insert("label".into(), json!("VIP"));
    let el = registry.resolve("Badge").unwrap().render(&props);
    assert_eq!(el.to_html(), "<span>VIP</span>");
}

// =============================================================================
// RENDERER
// =============================================================================

#[test]
fn unknown_component_renders_fallback_and_siblings_survive() {
    let tree = render_value(
        json!({
            "kind": "Layout",
            "grids": [{
                "columns": 2,
                "gap": 4,
                "rows": [{ "components": [
                    { "name": "UserHistoryCard", "props": { "items": [{ "date": "2024-05-01", "treatment": "Botox" }] } },
                    { "name": "DoesNotExist", "props": {} }
                ]}]
            }]
        }),
        ComponentRegistry::global(),
    )
    .unwrap();

    let slots = tree.slots();
    assert_eq!(slots.len(), 2);
    assert!(matches!(slots[0], RenderNode::Component { name, .. } if name == "UserHistoryCard"));
    assert!(matches!(slots[1], RenderNode::Fallback { name, .. } if name == "DoesNotExist"));
    assert_eq!(tree.fallback_names(), vec!["DoesNotExist"]);
}

#[test]
fn grid_carries_columns_and_gap() {
    let tree = render_value(
        json!({ "kind": "Layout", "grids": [{ "columns": 3, "gap": 2.5, "rows": [] }] }),
        &ComponentRegistry::new(),
    )
    .unwrap();
    let RenderNode::Grid { columns, gap, .. } = &tree.children()[0] else {
        panic!("expected grid");
    };
    assert_eq!(*columns, 3);
    assert!((gap - 2.5).abs() < f64::EPSILON);
}

#[test]
fn render_order_matches_document_order() {
    let names: Vec<Vec<Vec<String>>> = (0..3)
        .map(|g| (0..2).map(|r| (0..4).map(|c| format!("C{g}{r}{c}")).collect()).collect())
        .collect();
    let grids: Vec<serde_json::Value> = names
        .iter()
        .map(|rows| {
            json!({
                "columns": 4,
                "gap": 1,
                "rows": rows.iter().map(|comps| json!({
                    "components": comps.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>()
                })).collect::<Vec<_>>()
            })
        })
        .collect();

    let tree = render_value(json!({ "kind": "Layout", "grids": grids }), &ComponentRegistry::new()).unwrap();

    let expected: Vec<&str> = names.iter().flatten().flatten().map(String::as_str).collect();
    assert_eq!(tree.component_names(), expected);
}

#[test]
fn keys_are_structural_and_deterministic() {
    let value = json!({
        "kind": "Layout",
        "grids": [
            { "columns": 1, "gap": 0, "rows": [{ "components": [{ "name": "TextCard" }] }] },
            { "columns": 2, "gap": 0, "rows": [
                { "components": [] },
                { "components": [{ "name": "MetricCard" }, { "name": "Nope" }] }
            ]}
        ]
    });
    let a = render_value(value.clone(), ComponentRegistry::global()).unwrap();
    let b = render_value(value, ComponentRegistry::global()).unwrap();
    assert_eq!(a, b);

    let keys: Vec<&str> = a.slots().into_iter().filter_map(RenderNode::key).collect();
    assert_eq!(keys, vec!["g0-r0-c0", "g1-r1-c0", "g1-r1-c1"]);
    assert_eq!(a.children()[1].children()[1].key(), Some("g1-r1"));
}

#[test]
fn props_are_passed_verbatim() {
    let props = json!({ "label": "Bookings", "value": 42, "extra": { "nested": [1, 2] } });
    let tree = render_value(
        json!({
            "kind": "Layout",
            "grids": [{ "columns": 1, "gap": 0, "rows": [{ "components": [{ "name": "MetricCard", "props": props }] }] }]
        }),
        ComponentRegistry::global(),
    )
    .unwrap();
    let slots = tree.slots();
    let RenderNode::Component { props: rendered, .. } = slots[0] else {
        panic!("expected component");
    };
    assert_eq!(serde_json::Value::Object(rendered.clone()), props);
}

#[test]
fn malformed_document_is_fatal_not_partial() {
    let err = render_value(
        json!({ "kind": "Layout", "grids": [{ "columns": 2, "gap": 0, "rows": [{ "components": [{ "props": {} }] }] }] }),
        ComponentRegistry::global(),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_LAYOUT");
}

#[test]
fn render_layout_validates_typed_documents() {
    let d = LayoutDocument {
        kind: "Layout".into(),
        grids: vec![GridSection { columns: 0, gap: 0.0, rows: vec![] }],
    };
    assert!(render_layout(&d, ComponentRegistry::global()).is_err());
}

// =============================================================================
// HTML
// =============================================================================

#[test]
fn html_contains_grid_hints_and_fallback_label() {
    let tree = render_value(
        json!({
            "kind": "Layout",
            "grids": [{ "columns": 2, "gap": 4, "rows": [{ "components": [
                { "name": "TextCard", "props": { "text": "Hello <there>" } },
                { "name": "Mystery<Card>" }
            ]}]}]
        }),
        ComponentRegistry::global(),
    )
    .unwrap();
    let html = tree.to_html();
    assert!(html.starts_with("<div class=\"layout\">"));
    assert!(html.contains("grid-template-columns:repeat(2,minmax(0,1fr));gap:1rem"));
    assert!(html.contains("data-key=\"g0-r0-c0\""));
    assert!(html.contains("Hello &lt;there&gt;"));
    assert!(html.contains("Unknown component: Mystery&lt;Card&gt;"));
    assert!(html.contains("role=\"alert\""));
}

#[test]
fn render_tree_serializes_tagged() {
    let tree = render_value(
        json!({ "kind": "Layout", "grids": [{ "columns": 1, "gap": 0, "rows": [{ "components": [{ "name": "X" }] }] }] }),
        &ComponentRegistry::new(),
    )
    .unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["type"], "layout");
    assert_eq!(json["children"][0]["type"], "grid");
    assert_eq!(json["children"][0]["children"][0]["type"], "row");
    assert_eq!(json["children"][0]["children"][0]["children"][0], json!({ "type": "fallback", "key": "g0-r0-c0", "name": "X" }));
}

// =============================================================================
// ERROR CODES
// =============================================================================

#[test]
fn retryable_only_for_transport_and_server_errors() {
    assert!(LayoutError::Fetch("timeout".into()).retryable());
    assert!(LayoutError::ServiceStatus { status: 503, body: String::new() }.retryable());
    assert!(LayoutError::ServiceStatus { status: 429, body: String::new() }.retryable());
    assert!(!LayoutError::ServiceStatus { status: 400, body: String::new() }.retryable());
    assert!(!LayoutError::InvalidDocument("x".into()).retryable());
    assert!(!LayoutError::MalformedResponse { key: "k".into(), reason: "r".into() }.retryable());
}

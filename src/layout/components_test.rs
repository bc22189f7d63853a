use super::*;
use serde_json::json;

fn props(value: serde_json::Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => panic!("props must be an object"),
    }
}

fn render(name: &str, value: serde_json::Value) -> Element {
    let registry = register_defaults(ComponentRegistry::new());
    registry
        .resolve(name)
        .expect("built-in component")
        .render(&props(value))
}

#[test]
fn defaults_register_every_card() {
    let registry = register_defaults(ComponentRegistry::new());
    assert_eq!(
        registry.names(),
        vec![APPOINTMENT_LIST_CARD, METRIC_CARD, PATIENT_SUMMARY_CARD, TABLE_CARD, TEXT_CARD, USER_HISTORY_CARD]
    );
}

#[test]
fn user_history_lists_items_in_order() {
    let el = render(
        USER_HISTORY_CARD,
        json!({
            "title": "Visits",
            "items": [
                { "date": "2024-01-10", "treatment": "Botox", "notes": "20 units" },
                { "date": "2024-03-02", "title": "Filler" }
            ]
        }),
    );
    let html = el.to_html();
    assert!(html.contains("<h3>Visits</h3>"));
    let botox = html.find("Botox").unwrap();
    let filler = html.find("Filler").unwrap();
    assert!(botox < filler);
    assert!(html.contains("20 units"));
}

#[test]
fn user_history_without_items_shows_empty_note() {
    let el = render(USER_HISTORY_CARD, json!({}));
    assert!(el.text_content().contains("No history recorded."));
}

#[test]
fn patient_summary_skips_missing_fields() {
    let el = render(PATIENT_SUMMARY_CARD, json!({ "name": "Dana Ruiz", "patientId": "PT-1004", "age": 41 }));
    let text = el.text_content();
    assert!(text.contains("Dana Ruiz"));
    assert!(text.contains("PT-1004"));
    assert!(text.contains("41"));
    assert!(!text.contains("Last visit"));
}

#[test]
fn appointment_list_renders_each_appointment() {
    let el = render(
        APPOINTMENT_LIST_CARD,
        json!({ "appointments": [
            { "time": "09:00", "patient": "A", "service": "Peel" },
            { "time": "10:30", "patient": "B", "service": "Laser", "status": "confirmed" }
        ]}),
    );
    let html = el.to_html();
    assert_eq!(html.matches("<li>").count(), 2);
    assert!(html.contains("appointment-status"));
}

#[test]
fn metric_card_formats_numbers() {
    let el = render(METRIC_CARD, json!({ "label": "Revenue", "value": 12500, "delta": "+4%" }));
    let text = el.text_content();
    assert!(text.contains("Revenue"));
    assert!(text.contains("12500"));
    assert!(text.contains("+4%"));
}

#[test]
fn metric_card_without_value_shows_dash() {
    let el = render(METRIC_CARD, json!({ "label": "Rebookings" }));
    assert!(el.text_content().ends_with('-'));
}

#[test]
fn text_card_splits_paragraphs() {
    let el = render(TEXT_CARD, json!({ "text": "First.\n\nSecond.\n\n\n" }));
    assert_eq!(el.to_html().matches("<p>").count(), 2);
}

#[test]
fn text_card_accepts_content_alias() {
    let el = render(TEXT_CARD, json!({ "content": "hello" }));
    assert_eq!(el.text_content(), "hello");
}

#[test]
fn table_card_renders_header_and_rows() {
    let el = render(
        TABLE_CARD,
        json!({ "columns": ["Service", "Count"], "rows": [["Botox", 12], ["Filler", 7]] }),
    );
    let html = el.to_html();
    assert_eq!(html.matches("<th>").count(), 2);
    assert_eq!(html.matches("<td>").count(), 4);
    assert!(html.contains("<td>12</td>"));
}

#[test]
fn non_array_props_are_treated_as_empty() {
    let el = render(TABLE_CARD, json!({ "columns": "nope", "rows": 3 }));
    let html = el.to_html();
    assert!(!html.contains("<th>"));
    assert!(!html.contains("<td>"));
}

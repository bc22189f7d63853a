//! Built-in medspa cards the default registry is seeded with.
//!
//! Each card reads what it needs from its props and ignores the rest. Missing
//! props render as empty sections, never as errors: the agent that writes the
//! props is not under our control.

use serde_json::Value;

use super::registry::ComponentRegistry;
use super::{Element, Props};

pub const USER_HISTORY_CARD: &str = "UserHistoryCard";
pub const PATIENT_SUMMARY_CARD: &str = "PatientSummaryCard";
pub const APPOINTMENT_LIST_CARD: &str = "AppointmentListCard";
pub const METRIC_CARD: &str = "MetricCard";
pub const TEXT_CARD: &str = "TextCard";
pub const TABLE_CARD: &str = "TableCard";

pub(crate) fn register_defaults(registry: ComponentRegistry) -> ComponentRegistry {
    registry
        .register(USER_HISTORY_CARD, user_history_card)
        .register(PATIENT_SUMMARY_CARD, patient_summary_card)
        .register(APPOINTMENT_LIST_CARD, appointment_list_card)
        .register(METRIC_CARD, metric_card)
        .register(TEXT_CARD, text_card)
        .register(TABLE_CARD, table_card)
}

// =============================================================================
// PROP HELPERS
// =============================================================================

/// Read a scalar prop as display text. Strings pass through, numbers and
/// booleans are formatted, everything else is absent.
fn prop_text(props: &Props, key: &str) -> Option<String> {
    value_text(props.get(key)?)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn field_text(item: &Value, key: &str) -> Option<String> {
    value_text(item.get(key)?)
}

fn prop_items<'a>(props: &'a Props, key: &str) -> &'a [Value] {
    props
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

fn card(class: &'static str, title: Option<String>) -> Element {
    let el = Element::node("section").attr("class", format!("card {class}"));
    match title {
        Some(t) => el.child(Element::node("h3").child(Element::text(t))),
        None => el,
    }
}

fn empty_note(text: &'static str) -> Element {
    Element::node("p").attr("class", "card-empty").child(Element::text(text))
}

// =============================================================================
// CARDS
// =============================================================================

/// Treatment / visit history: `items: [{date, title | treatment, notes?}]`.
fn user_history_card(props: &Props) -> Element {
    let title = prop_text(props, "title").unwrap_or_else(|| "History".into());
    let items = prop_items(props, "items");
    let el = card("user-history", Some(title));
    if items.is_empty() {
        return el.child(empty_note("No history recorded."));
    }
    let list = Element::node("ol").children(items.iter().map(|item| {
        let what = field_text(item, "title")
            .or_else(|| field_text(item, "treatment"))
            .unwrap_or_default();
        let mut li = Element::node("li");
        if let Some(date) = field_text(item, "date") {
            li = li.child(Element::node("time").child(Element::text(date)));
        }
        li = li.child(Element::node("strong").child(Element::text(what)));
        if let Some(notes) = field_text(item, "notes") {
            li = li.child(Element::node("p").child(Element::text(notes)));
        }
        li
    }));
    el.child(list)
}

/// Patient header: `name`, `patientId`, plus any of `age`, `lastVisit`, `provider`, `notes`.
fn patient_summary_card(props: &Props) -> Element {
    let name = prop_text(props, "name").unwrap_or_else(|| "Unknown patient".into());
    let fields = [
        ("Patient ID", "patientId"),
        ("Age", "age"),
        ("Last visit", "lastVisit"),
        ("Provider", "provider"),
        ("Notes", "notes"),
    ];
    let dl = Element::node("dl").children(fields.iter().filter_map(|(label, key)| {
        let value = prop_text(props, key)?;
        Some(
            Element::node("div")
                .child(Element::node("dt").child(Element::text(*label)))
                .child(Element::node("dd").child(Element::text(value))),
        )
    }));
    card("patient-summary", Some(name)).child(dl)
}

/// Schedule table: `appointments: [{time, patient, service, status?}]`.
fn appointment_list_card(props: &Props) -> Element {
    let title = prop_text(props, "title").unwrap_or_else(|| "Appointments".into());
    let appointments = prop_items(props, "appointments");
    let el = card("appointment-list", Some(title));
    if appointments.is_empty() {
        return el.child(empty_note("No appointments."));
    }
    let rows = appointments.iter().map(|a| {
        let mut li = Element::node("li");
        for key in ["time", "patient", "service", "status"] {
            if let Some(v) = field_text(a, key) {
                li = li.child(
                    Element::node("span")
                        .attr("class", format!("appointment-{key}"))
                        .child(Element::text(v)),
                );
            }
        }
        li
    });
    el.child(Element::node("ul").children(rows))
}

/// Single KPI: `label`, `value`, optional `delta`.
fn metric_card(props: &Props) -> Element {
    let label = prop_text(props, "label").unwrap_or_default();
    let value = prop_text(props, "value").unwrap_or_else(|| "-".into());
    let mut el = card("metric", None)
        .child(Element::node("span").attr("class", "metric-label").child(Element::text(label)))
        .child(Element::node("span").attr("class", "metric-value").child(Element::text(value)));
    if let Some(delta) = prop_text(props, "delta") {
        el = el.child(Element::node("span").attr("class", "metric-delta").child(Element::text(delta)));
    }
    el
}

/// Free text: `title?`, `text` (or `content`), paragraphs split on blank lines.
fn text_card(props: &Props) -> Element {
    let body = prop_text(props, "text")
        .or_else(|| prop_text(props, "content"))
        .unwrap_or_default();
    let paragraphs = body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| Element::node("p").child(Element::text(p)))
        .collect::<Vec<_>>();
    card("text", prop_text(props, "title")).children(paragraphs)
}

/// Generic table: `columns: [string]`, `rows: [[scalar]]`.
fn table_card(props: &Props) -> Element {
    let head = Element::node("tr").children(
        prop_items(props, "columns")
            .iter()
            .map(|c| Element::node("th").child(Element::text(value_text(c).unwrap_or_default()))),
    );
    let body = prop_items(props, "rows").iter().map(|row| {
        let cells = row.as_array().map_or(&[][..], Vec::as_slice);
        Element::node("tr").children(
            cells
                .iter()
                .map(|c| Element::node("td").child(Element::text(value_text(c).unwrap_or_default()))),
        )
    });
    card("table", prop_text(props, "title")).child(
        Element::node("table")
            .child(Element::node("thead").child(head))
            .child(Element::node("tbody").children(body)),
    )
}

#[cfg(test)]
#[path = "components_test.rs"]
mod tests;

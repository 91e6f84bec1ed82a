//! CSV and text export of the event log.
//!
//! Two CSV strategies survive from this tool's history: a fixed column list
//! that keeps the header stable across heterogeneous event kinds, and a
//! dynamic one that flattens every nested key and loses no data but whose
//! header varies with the input. The fixed form is the canonical export;
//! the dynamic form stays available for consumers that want every field.
//!
//! All exporters are pure functions of the full collection and return the
//! empty string for an empty collection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::event::Event;

/// Column list of the fixed-schema CSV export.
pub const FIXED_COLUMNS: [&str; 33] = [
    "timestamp",
    "kind",
    "pageUrl",
    "pageTitle",
    "pageHeader",
    "selector",
    "tag",
    "id",
    "name",
    "type",
    "ariaLabel",
    "labelText",
    "placeholder",
    "value",
    "sample",
    "length",
    "redacted",
    "bbox_x",
    "bbox_y",
    "bbox_w",
    "bbox_h",
    "mouse_x",
    "mouse_y",
    "mouse_button",
    "mouse_ctrl",
    "mouse_alt",
    "mouse_shift",
    "mouse_meta",
    "formSelector",
    "formAction",
    "formMethod",
    "tabId",
    "winId",
];

/// Render the log as fixed-column CSV.
///
/// Each event is projected onto [`FIXED_COLUMNS`]; missing cells become the
/// empty string. Passed-through payload keys win over the projected record
/// fields when their names collide.
pub fn to_csv_fixed(events: &[Event]) -> String {
    if events.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(FIXED_COLUMNS.join(","));
    for event in events {
        let cells: Vec<String> = FIXED_COLUMNS
            .iter()
            .map(|column| escape(&fixed_cell(event, column)))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Render the log as dynamic-schema CSV.
///
/// Every event is recursively flattened into dotted/bracketed key paths
/// (`geometry.x`, `formContext.fields[0].name`); the header is the union of
/// all key paths in order of first appearance, and columns a row does not
/// have render as the empty string.
pub fn to_csv_dynamic(events: &[Event]) -> String {
    if events.is_empty() {
        return String::new();
    }

    let mut header: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<HashMap<String, String>> = Vec::with_capacity(events.len());

    for event in events {
        let value = serde_json::to_value(event).unwrap_or_else(|_| Value::Object(Default::default()));
        let mut flat = Vec::new();
        flatten_value(&value, "", &mut flat);
        for (key, _) in &flat {
            if seen.insert(key.clone()) {
                header.push(key.clone());
            }
        }
        rows.push(flat.into_iter().collect());
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        header
            .iter()
            .map(|column| escape(column))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in &rows {
        let cells: Vec<String> = header
            .iter()
            .map(|column| escape(row.get(column).map(String::as_str).unwrap_or("")))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Render the log as pretty-printed text, one record per block.
pub fn to_text(events: &[Event]) -> String {
    events
        .iter()
        .map(|event| serde_json::to_string_pretty(event).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Export file name with an embedded timestamp to avoid collisions.
pub fn export_filename(extension: &str, now: DateTime<Utc>) -> String {
    format!("logs-{}.{}", now.timestamp_millis(), extension)
}

/// Quote a cell when it contains a comma, a quote, or a newline; internal
/// quotes are doubled.
fn escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested structures that were not flattened render as JSON.
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn flatten_value(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(inner, &path, out);
            }
        }
        Value::Array(items) => {
            for (index, inner) in items.iter().enumerate() {
                flatten_value(inner, &format!("{prefix}[{index}]"), out);
            }
        }
        scalar => out.push((prefix.to_string(), value_to_cell(scalar))),
    }
}

fn fixed_cell(event: &Event, column: &str) -> String {
    // Payload keys override the projected top-level fields on collision.
    if let Some(value) = event.extra.get(column) {
        return value_to_cell(value);
    }

    let target = event.target.as_ref();
    let redaction = event.redaction.as_ref();
    let geometry = event.geometry.as_ref();
    let pointer = event.pointer.as_ref();
    let form = event.form_context.as_ref();

    match column {
        "timestamp" => event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        "kind" => event.kind.clone(),
        "pageUrl" => event.page_url.clone().unwrap_or_default(),
        "pageTitle" => event.page_title.clone().unwrap_or_default(),
        "pageHeader" => event.page_header.clone().unwrap_or_default(),
        "selector" => target.and_then(|t| t.selector.clone()).unwrap_or_default(),
        "tag" => target.and_then(|t| t.tag.clone()).unwrap_or_default(),
        "id" => target.and_then(|t| t.id.clone()).unwrap_or_default(),
        "name" => target.and_then(|t| t.name.clone()).unwrap_or_default(),
        "type" => target.and_then(|t| t.input_type.clone()).unwrap_or_default(),
        "ariaLabel" => target.and_then(|t| t.aria_label.clone()).unwrap_or_default(),
        "labelText" => target.and_then(|t| t.label_text.clone()).unwrap_or_default(),
        "placeholder" => target.and_then(|t| t.placeholder.clone()).unwrap_or_default(),
        "value" => event.value.clone().unwrap_or_default(),
        "sample" => redaction.and_then(|r| r.sample.clone()).unwrap_or_default(),
        "length" => redaction.map(|r| r.length.to_string()).unwrap_or_default(),
        "redacted" => redaction.map(|r| r.redacted.to_string()).unwrap_or_default(),
        "bbox_x" => geometry.map(|g| g.x.to_string()).unwrap_or_default(),
        "bbox_y" => geometry.map(|g| g.y.to_string()).unwrap_or_default(),
        "bbox_w" => geometry.map(|g| g.w.to_string()).unwrap_or_default(),
        "bbox_h" => geometry.map(|g| g.h.to_string()).unwrap_or_default(),
        "mouse_x" => pointer.map(|p| p.x.to_string()).unwrap_or_default(),
        "mouse_y" => pointer.map(|p| p.y.to_string()).unwrap_or_default(),
        "mouse_button" => pointer
            .and_then(|p| p.button)
            .map(|b| b.to_string())
            .unwrap_or_default(),
        "mouse_ctrl" => pointer.map(|p| p.ctrl.to_string()).unwrap_or_default(),
        "mouse_alt" => pointer.map(|p| p.alt.to_string()).unwrap_or_default(),
        "mouse_shift" => pointer.map(|p| p.shift.to_string()).unwrap_or_default(),
        "mouse_meta" => pointer.map(|p| p.meta.to_string()).unwrap_or_default(),
        "formSelector" => form.and_then(|f| f.selector.clone()).unwrap_or_default(),
        "formAction" => form.and_then(|f| f.action.clone()).unwrap_or_default(),
        "formMethod" => form.and_then(|f| f.method.clone()).unwrap_or_default(),
        "tabId" => event
            .source_tab
            .map(|id| id.to_string())
            .unwrap_or_default(),
        "winId" => event
            .source_window
            .map(|id| id.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Geometry, TargetInfo};
    use crate::redact::RedactionInfo;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, secs).unwrap()
    }

    fn click_event() -> Event {
        let mut event = Event::new(at(0), "click");
        event.page_url = Some("https://example.test/cart".to_string());
        event.target = Some(TargetInfo {
            selector: Some("button#go".to_string()),
            tag: Some("button".to_string()),
            id: Some("go".to_string()),
            ..TargetInfo::default()
        });
        event.geometry = Some(Geometry {
            x: 10,
            y: 21,
            w: 100,
            h: 30,
        });
        event
    }

    fn input_event(value: &str) -> Event {
        let mut event = Event::new(at(1), "input");
        event.value = Some(value.to_string());
        event.redaction = Some(RedactionInfo {
            redacted: false,
            length: value.chars().count(),
            sample: Some(value.chars().take(8).collect()),
        });
        event
    }

    #[test]
    fn test_empty_collection_exports_empty_string() {
        assert_eq!(to_csv_fixed(&[]), "");
        assert_eq!(to_csv_dynamic(&[]), "");
        assert_eq!(to_text(&[]), "");
    }

    #[test]
    fn test_fixed_header_and_row_projection() {
        let events = vec![click_event(), input_event("abc")];
        let csv = to_csv_fixed(&events);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,kind,pageUrl,"));
        assert!(lines[1].contains("click"));
        assert!(lines[1].contains("button#go"));
        assert!(lines[1].contains(",10,21,100,30,"));
        // Unquoted plain value in both the value and sample columns.
        assert!(lines[2].contains(",abc,abc,3,false,"));
    }

    #[test]
    fn test_fixed_missing_cells_are_empty() {
        let csv = to_csv_fixed(&[Event::new(at(0), "window_removed")]);
        let lines: Vec<&str> = csv.lines().collect();
        let cells: Vec<&str> = lines[1].split(',').collect();

        assert_eq!(cells.len(), FIXED_COLUMNS.len());
        assert_eq!(cells[1], "window_removed");
        assert!(cells[2..].iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_payload_keys_override_projected_fields() {
        let mut event = click_event();
        event
            .extra
            .insert("value".to_string(), Value::String("override".to_string()));
        let csv = to_csv_fixed(&[event]);
        assert!(csv.lines().nth(1).unwrap().contains("override"));
    }

    #[test]
    fn test_escaping_quotes_commas_and_newlines() {
        let events = vec![
            input_event("a,b"),
            input_event("say \"hi\""),
            input_event("line1\nline2"),
        ];
        let csv = to_csv_fixed(&events);

        assert!(csv.contains("\"a,b\""));
        assert!(csv.contains("\"say \"\"hi\"\"\""));
        assert!(csv.contains("\"line1\nline2\""));
    }

    #[test]
    fn test_plain_cells_are_not_quoted() {
        let csv = to_csv_fixed(&[input_event("plain")]);
        assert!(csv.contains(",plain,"));
        assert!(!csv.contains("\"plain\""));
    }

    #[test]
    fn test_dynamic_header_is_union_of_key_paths() {
        let events = vec![click_event(), input_event("abc")];
        let csv = to_csv_dynamic(&events);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        let header: Vec<&str> = lines[0].split(',').collect();
        assert!(header.contains(&"kind"));
        assert!(header.contains(&"geometry.x"));
        assert!(header.contains(&"target.selector"));
        // Key contributed only by the second event still makes the header.
        assert!(header.contains(&"redactionInfo.sample"));

        // The click row has no value column content.
        let value_idx = header.iter().position(|h| *h == "value").unwrap();
        let row1: Vec<&str> = lines[1].split(',').collect();
        let row2: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(row1[value_idx], "");
        assert_eq!(row2[value_idx], "abc");
    }

    #[test]
    fn test_dynamic_flattens_arrays_with_indices() {
        let mut event = Event::new(at(0), "form_submit");
        event.form_context = Some(crate::event::FormContext {
            selector: Some("form#checkout".to_string()),
            action: Some("/pay".to_string()),
            method: Some("post".to_string()),
            fields: vec![crate::event::FormField {
                name: "email".to_string(),
                redaction: RedactionInfo {
                    redacted: false,
                    length: 8,
                    sample: Some("a@b.test".to_string()),
                },
                value: Some("a@b.test".to_string()),
            }],
        });

        let csv = to_csv_dynamic(&[event]);
        assert!(csv.contains("formContext.fields[0].name"));
        assert!(csv.contains("formContext.fields[0].redacted"));
    }

    #[test]
    fn test_exports_are_idempotent() {
        let events = vec![click_event(), input_event("a,b"), input_event("plain")];
        assert_eq!(to_csv_fixed(&events), to_csv_fixed(&events));
        assert_eq!(to_csv_dynamic(&events), to_csv_dynamic(&events));
        assert_eq!(to_text(&events), to_text(&events));
    }

    #[test]
    fn test_text_export_separates_records() {
        let events = vec![click_event(), input_event("abc")];
        let text = to_text(&events);

        assert_eq!(text.matches("\n\n---\n\n").count(), 1);
        assert!(text.contains("\"kind\": \"click\""));
        assert!(text.contains("\"kind\": \"input\""));
    }

    #[test]
    fn test_export_filename_embeds_epoch_millis() {
        let now = at(0);
        assert_eq!(
            export_filename("csv", now),
            format!("logs-{}.csv", now.timestamp_millis())
        );
    }
}

//! Canonical event records.
//!
//! Every captured interaction, whatever shape it arrived in, becomes one
//! [`Event`]. Only `timestamp` and `kind` are guaranteed; every other field
//! is optional and omitted from the serialized form when absent. Events are
//! immutable once appended to the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::redact::RedactionInfo;

/// A normalized interaction or lifecycle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Capture time, assigned by the normalizer.
    pub timestamp: DateTime<Utc>,
    /// Interaction type tag. Open vocabulary: `click`, `keydown`, `input`,
    /// `change`, `form_submit`, `tab_activated`, `window_created` and
    /// whatever else a capture source emits.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_header: Option<String>,
    /// Descriptor of the UI element involved, when the raw event had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetInfo>,
    /// Field content. Present only when the redactor let it through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(
        rename = "redactionInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub redaction: Option<RedactionInfo>,
    /// Bounding box of the target element, rounded to whole pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_context: Option<FormContext>,
    /// Identifier of the originating browser tab, for chrome-level events.
    #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
    pub source_tab: Option<i64>,
    /// Identifier of the originating browser window.
    #[serde(rename = "winId", default, skip_serializing_if = "Option::is_none")]
    pub source_window: Option<i64>,
    /// Unrecognized payload keys, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Event {
    /// Create a minimal event with the given timestamp and kind.
    pub fn new(timestamp: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            page_url: None,
            page_title: None,
            page_header: None,
            target: None,
            value: None,
            redaction: None,
            geometry: None,
            pointer: None,
            form_context: None,
            source_tab: None,
            source_window: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Descriptor fields of the element an event targeted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    /// Compact `"{tag}{#id}{.classes}"` summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Element bounding box in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Mouse position and modifier state at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerInfo {
    pub x: i64,
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<i64>,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

/// Context of a form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// One named field of a submitted form.
///
/// Redaction applies per field: a redacted field drops its `value` while the
/// rest of the form keeps theirs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(flatten)]
    pub redaction: RedactionInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let event = Event::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(), "click");
        let json = serde_json::to_value(&event).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("timestamp"));
        assert_eq!(obj["kind"], "click");
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut event = Event::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(), "input");
        event.page_url = Some("https://example.test/form".to_string());
        event.value = Some("abc".to_string());
        event.redaction = Some(crate::redact::RedactionInfo {
            redacted: false,
            length: 3,
            sample: Some("abc".to_string()),
        });
        event
            .extra
            .insert("textSample".to_string(), Value::String("Sign in".to_string()));

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let mut event = Event::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(), "tab_activated");
        event.page_url = Some("https://example.test/".to_string());
        event.source_tab = Some(7);
        event.redaction = Some(crate::redact::RedactionInfo {
            redacted: true,
            length: 4,
            sample: None,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("pageUrl").is_some());
        assert!(json.get("tabId").is_some());
        assert!(json.get("redactionInfo").is_some());
        assert!(json.get("page_url").is_none());
    }
}

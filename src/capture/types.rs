//! Wire shapes emitted by the capture-source collaborators.
//!
//! These types accept whatever subset of fields a source actually sends:
//! every field is optional or defaulted, and unknown payload keys are kept
//! in a pass-through map instead of being rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::selector::ElementDescriptor;

/// One raw capture event plus the page context it was observed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEnvelope {
    /// Raw event name, e.g. `click`, `input`, `form_submit`, `tab_created`.
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub data: RawPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_header: Option<String>,
    /// Set by chrome-level sources for tab lifecycle events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_id: Option<i64>,
}

/// Event-specific payload of a capture envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementDescriptor>,
    /// Raw field content. Only ever leaves the normalizer through the
    /// redactor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<RawGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse: Option<RawPointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<RawForm>,
    /// Anything else the source attached, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Bounding box as reported by the source, possibly fractional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGeometry {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
}

/// Mouse position and modifier state as reported by the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPointer {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
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

/// A form submission with its named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForm {
    /// Descriptor of the form element itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub fields: Vec<RawFormField>,
}

/// One field of a submitted form: its descriptor plus the raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormField {
    #[serde(flatten)]
    pub element: ElementDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

//! Event normalization.
//!
//! Raw capture envelopes arrive in whatever shape the source produced; this
//! module turns each one into a canonical [`Event`]. Normalization is total:
//! missing or malformed sub-fields degrade to absent fields, and a
//! constructed event is always returned.

use chrono::{DateTime, Utc};

use crate::capture::types::{CaptureEnvelope, RawForm, RawGeometry, RawPointer};
use crate::event::{Event, FormContext, FormField, Geometry, PointerInfo, TargetInfo};
use crate::redact::classify;
use crate::selector::{summarize, ElementDescriptor};

/// Ambient context a capture source supplies alongside each raw event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureContext {
    pub page_url: Option<String>,
    pub page_title: Option<String>,
    pub page_header: Option<String>,
    /// Originating tab, for chrome-level lifecycle events.
    pub tab_id: Option<i64>,
    pub window_id: Option<i64>,
}

impl CaptureContext {
    /// Build the context carried inside an envelope itself.
    pub fn from_envelope(envelope: &CaptureEnvelope) -> Self {
        Self {
            page_url: envelope.url.clone(),
            page_title: envelope.title.clone(),
            page_header: envelope.page_header.clone(),
            tab_id: envelope.tab_id,
            window_id: envelope.win_id,
        }
    }
}

/// Normalize a raw capture event, stamping it with the current time.
pub fn normalize(envelope: &CaptureEnvelope, context: &CaptureContext) -> Event {
    normalize_at(envelope, context, Utc::now())
}

/// Normalize a raw capture event with an explicit timestamp.
///
/// The event name is copied verbatim (open vocabulary, no validation), the
/// target is summarized when an element is present, and any field value goes
/// through the redactor before it may be attached.
pub fn normalize_at(
    envelope: &CaptureEnvelope,
    context: &CaptureContext,
    timestamp: DateTime<Utc>,
) -> Event {
    let data = &envelope.data;

    let target = data.element.as_ref().map(target_info);

    // Field values only ever leave through the redactor.
    let (value, redaction) = match data.value.as_deref() {
        Some(raw) => {
            let fallback = ElementDescriptor::default();
            let descriptor = data.element.as_ref().unwrap_or(&fallback);
            let info = classify(descriptor, Some(raw));
            let value = (!info.redacted).then(|| raw.to_string());
            (value, Some(info))
        }
        None => (None, None),
    };

    Event {
        timestamp,
        kind: envelope.event.clone(),
        page_url: context.page_url.clone(),
        page_title: context.page_title.clone(),
        page_header: context.page_header.clone(),
        target,
        value,
        redaction,
        geometry: data.bbox.as_ref().map(round_geometry),
        pointer: data.mouse.as_ref().map(round_pointer),
        form_context: data.form.as_ref().map(normalize_form),
        source_tab: context.tab_id,
        source_window: context.window_id,
        extra: data.extra.clone(),
    }
}

fn target_info(element: &ElementDescriptor) -> TargetInfo {
    TargetInfo {
        selector: Some(element.short_selector()),
        tag: element.tag.as_ref().map(|t| t.to_lowercase()),
        id: element.id.clone(),
        name: element.name.clone(),
        input_type: element.input_type.clone(),
        aria_label: element.aria_label.clone(),
        label_text: element.label_text.clone(),
        placeholder: element.placeholder.clone(),
    }
}

fn round_geometry(bbox: &RawGeometry) -> Geometry {
    Geometry {
        x: bbox.x.round() as i64,
        y: bbox.y.round() as i64,
        w: bbox.w.round() as i64,
        h: bbox.h.round() as i64,
    }
}

fn round_pointer(mouse: &RawPointer) -> PointerInfo {
    PointerInfo {
        x: mouse.x.round() as i64,
        y: mouse.y.round() as i64,
        button: mouse.button,
        ctrl: mouse.ctrl,
        alt: mouse.alt,
        shift: mouse.shift,
        meta: mouse.meta,
    }
}

// Redaction applies to each named field on its own: a redacted field drops
// its value, the rest of the form keeps theirs.
fn normalize_form(form: &RawForm) -> FormContext {
    FormContext {
        selector: summarize(form.element.as_ref()),
        action: form.action.clone(),
        method: form.method.clone(),
        fields: form
            .fields
            .iter()
            .map(|field| {
                let info = classify(&field.element, field.value.as_deref());
                FormField {
                    name: field.element.name.clone().unwrap_or_default(),
                    value: if info.redacted {
                        None
                    } else {
                        field.value.clone()
                    },
                    redaction: info,
                }
            })
            .collect(),
    }
}

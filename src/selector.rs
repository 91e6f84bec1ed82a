//! Compact element identifiers.
//!
//! The capture side hands us whatever it knows about an element (tag, id,
//! class list, form attributes). This module condenses that into one short,
//! human-readable selector string so the log and the exports agree on a
//! single identifier shape: `"{tag}{#id}{.c1.c2.c3}"`.

use serde::{Deserialize, Serialize};

/// Maximum number of classes included in a selector summary.
const MAX_CLASSES: usize = 3;

/// Abstract description of a UI element as the capture source saw it.
///
/// All fields are optional; the capture source sends only what the element
/// actually had. Field names follow the DOM attribute names on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Space-separated class list, as found in the `class` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ElementDescriptor {
    /// Render the `"{tag}{#id}{.c1.c2.c3}"` summary for this element.
    ///
    /// The tag defaults to `node` when absent, the `#id` segment is omitted
    /// when there is no id, and at most the first [`MAX_CLASSES`] classes
    /// are kept. Deterministic for a given descriptor.
    pub fn short_selector(&self) -> String {
        let tag = match self.tag.as_deref() {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => "node".to_string(),
        };

        let id = match self.id.as_deref() {
            Some(i) if !i.is_empty() => format!("#{i}"),
            _ => String::new(),
        };

        let classes = match self.class.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => {
                let picked: Vec<&str> = c.split_whitespace().take(MAX_CLASSES).collect();
                format!(".{}", picked.join("."))
            }
            _ => String::new(),
        };

        format!("{tag}{id}{classes}")
    }
}

/// Summarize an optional element; absent input yields `None`.
pub fn summarize(element: Option<&ElementDescriptor>) -> Option<String> {
    element.map(ElementDescriptor::short_selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(tag: Option<&str>, id: Option<&str>, class: Option<&str>) -> ElementDescriptor {
        ElementDescriptor {
            tag: tag.map(String::from),
            id: id.map(String::from),
            class: class.map(String::from),
            ..ElementDescriptor::default()
        }
    }

    #[test]
    fn test_full_selector_shape() {
        let el = descriptor(Some("BUTTON"), Some("go"), Some("btn btn-primary wide"));
        assert_eq!(el.short_selector(), "button#go.btn.btn-primary.wide");
    }

    #[test]
    fn test_tag_defaults_to_node() {
        let el = descriptor(None, Some("root"), None);
        assert_eq!(el.short_selector(), "node#root");

        assert_eq!(ElementDescriptor::default().short_selector(), "node");
    }

    #[test]
    fn test_class_segment_capped_at_three() {
        let el = descriptor(Some("div"), None, Some("a b c d e"));
        assert_eq!(el.short_selector(), "div.a.b.c");
    }

    #[test]
    fn test_class_whitespace_is_collapsed() {
        let el = descriptor(Some("div"), None, Some("  left   right  "));
        assert_eq!(el.short_selector(), "div.left.right");

        let blank = descriptor(Some("div"), None, Some("   "));
        assert_eq!(blank.short_selector(), "div");
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let el = descriptor(Some("input"), Some("email"), Some("field"));
        let first = summarize(Some(&el));
        let second = summarize(Some(&el));
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("input#email.field"));
    }

    #[test]
    fn test_summarize_absent_element() {
        assert_eq!(summarize(None), None);
    }
}

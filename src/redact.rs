//! Sensitive-value redaction.
//!
//! Field values are end-user input and may contain credentials or PII, so
//! classification is deliberately conservative: known-sensitive input types
//! and substring hints in the field name or autocomplete attribute all
//! trigger redaction. False positives are acceptable; a leaked raw value is
//! not.

use serde::{Deserialize, Serialize};

use crate::selector::ElementDescriptor;

/// Input types whose values are always redacted.
pub const SENSITIVE_TYPES: [&str; 2] = ["password", "tel"];

/// Substrings of a field name or autocomplete hint that trigger redaction.
pub const SENSITIVE_HINTS: [&str; 5] = ["cc", "card", "cvv", "ssn", "aadhaar"];

/// Number of leading characters kept as a sample of an unredacted value.
const SAMPLE_LEN: usize = 8;

/// Outcome of classifying one field value.
///
/// When `redacted` is true the raw value is gone for good; only its
/// character count survives. Otherwise a short sample is kept alongside the
/// length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub redacted: bool,
    /// Character length of the raw value (0 when absent).
    pub length: usize,
    /// First [`SAMPLE_LEN`] characters of the raw value. Never present when
    /// redacted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// Classify a field value against the descriptor of the field it came from.
///
/// Total over its inputs: an absent value counts as the empty string, and a
/// descriptor with no type, name, or autocomplete attribute is simply not
/// sensitive.
pub fn classify(element: &ElementDescriptor, raw: Option<&str>) -> RedactionInfo {
    let length = raw.map(|v| v.chars().count()).unwrap_or(0);

    let input_type = element.input_type.as_deref().unwrap_or("").to_lowercase();
    let name = element.name.as_deref().unwrap_or("").to_lowercase();
    let autocomplete = element.autocomplete.as_deref().unwrap_or("").to_lowercase();

    if SENSITIVE_TYPES.contains(&input_type.as_str()) {
        return RedactionInfo {
            redacted: true,
            length,
            sample: None,
        };
    }

    if SENSITIVE_HINTS
        .iter()
        .any(|hint| name.contains(hint) || autocomplete.contains(hint))
    {
        return RedactionInfo {
            redacted: true,
            length,
            sample: None,
        };
    }

    RedactionInfo {
        redacted: false,
        length,
        sample: Some(
            raw.map(|v| v.chars().take(SAMPLE_LEN).collect())
                .unwrap_or_default(),
        ),
    }
}

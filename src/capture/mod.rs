//! Capture-source collaborators.
//!
//! Raw events reach this process as newline-delimited JSON envelopes, the
//! shape a browser-extension native-messaging host or a piped capture script
//! produces. Page-level sources attach element descriptors, values and
//! geometry; chrome-level sources send tab/window lifecycle notices with
//! tab/window identifiers and no element.

pub mod source;
pub mod types;

// Re-export commonly used types
pub use source::{EnvelopeSource, SourceStats};
pub use types::{CaptureEnvelope, RawForm, RawFormField, RawGeometry, RawPayload, RawPointer};

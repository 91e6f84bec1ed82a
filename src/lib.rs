//! Taskmine Logger - privacy-safe browser interaction logging.
//!
//! This library turns raw, schema-less browser capture events into a
//! consistent, privacy-safe, exportable record set.
//!
//! # Privacy Guarantees
//!
//! - **No sensitive values**: password/tel inputs and fields hinting at
//!   cards, CVVs, SSNs or Aadhaar numbers are redacted before storage;
//!   only the value's character count survives
//! - **Conservative by default**: classification prefers false positives
//!   over leaking a credential
//! - **Short samples only**: unredacted values keep at most an 8-character
//!   sample in their redaction summary
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Taskmine Logger                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Capture   │──▶│ Normalizer  │──▶│  Event Log  │       │
//! │  │   Source    │   │ (+ redact)  │   │    Store    │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                             │               │
//! │                                             ▼               │
//! │                                      ┌─────────────┐       │
//! │                                      │  CSV / Text │       │
//! │                                      │   Exporter  │       │
//! │                                      └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use taskmine_logger::{
//!     normalize, CaptureContext, CaptureEnvelope, EventLogStore, MemoryStore,
//! };
//!
//! let envelope: CaptureEnvelope =
//!     serde_json::from_str(r#"{"event":"click","url":"https://example.test/"}"#).unwrap();
//! let context = CaptureContext::from_envelope(&envelope);
//!
//! let mut store = EventLogStore::new(MemoryStore::new());
//! store.append(normalize(&envelope, &context)).unwrap();
//! ```

pub mod capture;
pub mod config;
pub mod event;
pub mod export;
pub mod normalize;
pub mod redact;
pub mod selector;
pub mod store;

// Re-export key types at crate root for convenience
pub use capture::{CaptureEnvelope, EnvelopeSource, RawPayload, SourceStats};
pub use config::{Config, ConfigError};
pub use event::{Event, FormContext, FormField, Geometry, PointerInfo, TargetInfo};
pub use export::{export_filename, to_csv_dynamic, to_csv_fixed, to_text, FIXED_COLUMNS};
pub use normalize::{normalize, normalize_at, CaptureContext};
pub use redact::{classify, RedactionInfo, SENSITIVE_HINTS, SENSITIVE_TYPES};
pub use selector::{summarize, ElementDescriptor};
pub use store::{
    EventLogStore, JsonFileStore, KeyValueStore, MemoryStore, StoreError, STORAGE_KEY,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Redaction policy that can be displayed to users.
pub const REDACTION_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║              TASKMINE LOGGER - REDACTION POLICY                  ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This tool logs browser interactions for task-mining analysis.   ║
║                                                                  ║
║  ✓ WHAT WE LOG:                                                  ║
║    • When and where interactions happen (clicks, keys, forms)    ║
║    • Compact element selectors and page context                  ║
║    • Field values that pass the redaction filter                 ║
║                                                                  ║
║  ✗ WHAT WE NEVER LOG:                                            ║
║    • Password or telephone field contents                        ║
║    • Fields hinting at cards, CVVs, SSNs or Aadhaar numbers      ║
║      (only the value's character count is kept)                  ║
║                                                                  ║
║  All data stays on this machine until you export it yourself.    ║
║                                                                  ║
║  You can review the stored log anytime with:                     ║
║    taskmine-logger show                                          ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

// Extractor crate for cleaning-service log lines
//
// Turns free-text Chinese service records (one job per line) into
// structured rows plus per-line diagnostics. Pure and synchronous; the
// HTTP surface lives in the service crate.

pub mod fields;
pub mod line;
pub mod record_extractor;
pub mod types;

// Re-export main types and the entry point
pub use record_extractor::extract;
pub use types::{Extraction, FieldError, ParseError, ServiceRecord};

//! Batch extraction entry point.

use crate::line::derive_record;
use crate::types::{Extraction, ParseError};
use tracing::{debug, info, warn};

/// Convert raw multi-line text into records plus per-line diagnostics.
///
/// Lines are processed independently: a line that fails to derive is
/// recorded as a `ParseError` with its 1-based line number (blank lines
/// count) and processing continues. Blank lines produce neither a record
/// nor an error. Empty input yields empty output.
///
/// Pure and stateless; calling it twice on the same text gives the same
/// result.
pub fn extract(text: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match derive_record(line) {
            Ok(record) => extraction.records.push(record),
            Err(e) => {
                let error = ParseError {
                    line: idx + 1,
                    message: e.to_string(),
                };
                warn!("{}", error);
                extraction.errors.push(error);
            }
        }
    }

    debug!(
        "extraction finished: {} records, {} errors",
        extraction.records.len(),
        extraction.errors.len()
    );
    if extraction.records.is_empty() && !text.trim().is_empty() {
        info!("no records extracted from non-empty input");
    }

    extraction
}

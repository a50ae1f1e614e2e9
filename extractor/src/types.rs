use serde::{Deserialize, Serialize};

/// One structured cleaning-service record derived from one input line.
///
/// String fields that fail to match carry a sentinel default instead of
/// being absent, so a record is always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub technician: String,
    pub date: String,
    pub community: String,
    /// Composed "<building>号楼<unit>单元" address fragment. Each piece
    /// falls back to "未知" independently when not found.
    pub building_unit: String,
    pub room: String,
    pub cleaning_mode: String,
    pub cleaning_scope: String,
    pub visit_count: u32,
    pub amount: u32,
    pub payment_method: String,
}

/// A per-line diagnostic. `line` is 1-based and counts blank lines, so it
/// points back at the offending line of the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "行 {} 解析失败: {}", self.line, self.message)
    }
}

/// Result of one batch extraction: records in input order plus the
/// diagnostics for lines that failed to derive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub records: Vec<ServiceRecord>,
    pub errors: Vec<ParseError>,
}

/// Failure while deriving a single field value. A pattern that simply does
/// not match is not an error (the field defaults instead); this covers the
/// case where a pattern matched but the captured text could not be
/// converted.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("{field}数值无效: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

//! Anchored field patterns.
//!
//! Each field is extracted by its own pattern, anchored on the literal
//! connector tokens of the input template. The patterns are independent on
//! purpose: a partial or malformed line still yields values for whatever
//! anchors it does contain, and the rest default. This is what makes the
//! extractor degrade gracefully instead of rejecting whole lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Sentinel for string fields whose anchor pair was not found.
pub const UNKNOWN: &str = "未知";
/// Sentinel for a missing date fragment.
pub const UNKNOWN_DATE: &str = "日期未知";
/// Sentinel for a missing community name.
pub const UNKNOWN_COMMUNITY: &str = "未知小区";

lazy_static! {
    static ref TECHNICIAN_RE: Regex = Regex::new(r"^(.+?)在").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"在(.+?)日").unwrap();
    static ref COMMUNITY_RE: Regex = Regex::new(r"为(.+?)小区的").unwrap();
    static ref BUILDING_RE: Regex = Regex::new(r"(\d+)号楼").unwrap();
    static ref UNIT_RE: Regex = Regex::new(r"号楼(\d+)单元").unwrap();
    static ref ROOM_RE: Regex = Regex::new(r"单元(\d+室)").unwrap();
    static ref MODE_RE: Regex = Regex::new(r"进行了(.+?)清洁").unwrap();
    static ref SCOPE_RE: Regex = Regex::new(r"包括(.+?)，共进行了").unwrap();
    static ref COUNT_RE: Regex = Regex::new(r"共进行了(\d+)次").unwrap();
    static ref AMOUNT_RE: Regex = Regex::new(r"总金额为(\d+)元").unwrap();
    static ref PAYMENT_RE: Regex = Regex::new(r"付款方式为(.+?)$").unwrap();
}

/// First capture of `re` in `line`, trimmed. None when the anchor pair is
/// absent.
fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn technician(line: &str) -> String {
    capture(&TECHNICIAN_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn date(line: &str) -> String {
    // The trailing day marker is part of the anchor, so it is appended back.
    capture(&DATE_RE, line)
        .map(|d| format!("{}日", d))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn community(line: &str) -> String {
    capture(&COMMUNITY_RE, line)
        .map(|c| format!("{}小区", c))
        .unwrap_or_else(|| UNKNOWN_COMMUNITY.to_string())
}

pub fn building(line: &str) -> String {
    capture(&BUILDING_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn unit(line: &str) -> String {
    capture(&UNIT_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn room(line: &str) -> String {
    capture(&ROOM_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn cleaning_mode(line: &str) -> String {
    capture(&MODE_RE, line)
        .map(|m| format!("{}清洁", m))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn cleaning_scope(line: &str) -> String {
    capture(&SCOPE_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Captured digit run for the visit count, unparsed. None means the anchor
/// pair is absent and the caller defaults to 0.
pub fn visit_count(line: &str) -> Option<String> {
    capture(&COUNT_RE, line)
}

/// Captured digit run for the amount, unparsed.
pub fn amount(line: &str) -> Option<String> {
    capture(&AMOUNT_RE, line)
}

/// Payment method runs to end of line. Trailing punctuation stays: the
/// anchor has no right boundary, so whatever the line ends with is part of
/// the value.
pub fn payment_method(line: &str) -> String {
    capture(&PAYMENT_RE, line).unwrap_or_else(|| UNKNOWN.to_string())
}

use chrono::{DateTime, Utc};
use extractor::{ParseError, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed 11-column output schema shared by the table, the xlsx export and
/// the CSV export.
pub const COLUMNS: [&str; 11] = [
    "师傅", "区域", "日期", "物业", "地址", "房号", "清洗方式", "清洗内容", "数量", "金额",
    "付款方式",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub records: Vec<ServiceRecord>,
    /// Per-line warnings; non-fatal as long as at least one record parsed.
    pub errors: Vec<ParseError>,
    pub summary: Summary,
    pub charts: Charts,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub record_count: usize,
    pub total_amount: u64,
    /// Mean amount rounded to the nearest integer; 0 when there are no
    /// records.
    pub mean_amount: u64,
}

impl Summary {
    pub fn from_records(records: &[ServiceRecord]) -> Self {
        let total_amount: u64 = records.iter().map(|r| u64::from(r.amount)).sum();
        let mean_amount = if records.is_empty() {
            0
        } else {
            (total_amount as f64 / records.len() as f64).round() as u64
        };

        Summary {
            record_count: records.len(),
            total_amount,
            mean_amount,
        }
    }
}

/// Aggregations backing the frontend's three bar charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charts {
    pub by_technician: Vec<CategoryCount>,
    pub by_cleaning_mode: Vec<CategoryCount>,
    /// Raw per-record amounts in record order.
    pub amounts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

impl Charts {
    pub fn from_records(records: &[ServiceRecord]) -> Self {
        Charts {
            by_technician: value_counts(records.iter().map(|r| r.technician.as_str())),
            by_cleaning_mode: value_counts(records.iter().map(|r| r.cleaning_mode.as_str())),
            amounts: records.iter().map(|r| r.amount).collect(),
        }
    }
}

/// Count occurrences per distinct value, descending by count with label as
/// tie-break, so the chart ordering is stable across calls.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut pairs: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    pairs
}

/// Flatten one record into the 11-column schema. 区域 and 物业 are both the
/// community value; the duplication is kept for output compatibility with
/// the established schema.
pub fn record_row(record: &ServiceRecord) -> [String; 11] {
    [
        record.technician.clone(),
        record.community.clone(),
        record.date.clone(),
        record.community.clone(),
        record.building_unit.clone(),
        record.room.clone(),
        record.cleaning_mode.clone(),
        record.cleaning_scope.clone(),
        record.visit_count.to_string(),
        record.amount.to_string(),
        record.payment_method.clone(),
    ]
}

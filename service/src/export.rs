//! Spreadsheet and CSV serialization of the record table, built into
//! in-memory buffers that the routes return as downloadable attachments.

use crate::models::{record_row, COLUMNS};
use extractor::ServiceRecord;
use rust_xlsxwriter::Workbook;
use tracing::debug;

pub const XLSX_FILENAME: &str = "清洗服务记录.xlsx";
pub const CSV_FILENAME: &str = "清洗服务记录.csv";
pub const SHEET_NAME: &str = "清洗服务记录";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("xlsx serialization failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize records into a single-sheet xlsx workbook: a header row, one
/// row per record, numeric cells for count and amount, and every column
/// sized to its widest cell (at least the header width) plus two.
pub fn to_xlsx(records: &[ServiceRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    let rows: Vec<[String; 11]> = records.iter().map(record_row).collect();
    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        let cells = &rows[idx];

        for col in 0..8 {
            worksheet.write_string(row, col as u16, cells[col].as_str())?;
        }
        worksheet.write_number(row, 8, record.visit_count)?;
        worksheet.write_number(row, 9, record.amount)?;
        worksheet.write_string(row, 10, cells[10].as_str())?;
    }

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.set_column_width(col as u16, column_width(header, &rows, col) as f64)?;
    }

    let buffer = workbook.save_to_buffer()?;
    debug!("serialized {} records into {} xlsx bytes", records.len(), buffer.len());
    Ok(buffer)
}

/// Width in characters of column `col`: the widest cell, floored at the
/// header width, plus two for padding.
fn column_width(header: &str, rows: &[[String; 11]], col: usize) -> usize {
    let widest = rows
        .iter()
        .map(|cells| cells[col].chars().count())
        .max()
        .unwrap_or(0);
    widest.max(header.chars().count()) + 2
}

/// Serialize records as CSV with the same 11 columns and header.
pub fn to_csv(records: &[ServiceRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record_row(record))?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

/// Content-Disposition for a download, with an ASCII fallback name and the
/// real (Chinese) filename percent-encoded per RFC 5987. Header values must
/// be ASCII, so the UTF-8 name cannot be sent verbatim.
pub fn content_disposition(ascii_fallback: &str, filename: &str) -> String {
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback, encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ServiceRecord> {
        extractor::extract(
            "张师傅在2023年10月15日为阳光花园小区的1号楼2单元302室进行了深度清洁，清洗内容包括地面、墙面和窗户，共进行了3次，总金额为300元，付款方式为微信支付。",
        )
        .records
    }

    #[test]
    fn test_xlsx_buffer_is_nonempty_zip() {
        let bytes = to_xlsx(&sample_records()).unwrap();
        // xlsx is a zip container; check the magic instead of unpacking.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_xlsx_accepts_empty_record_set() {
        // The routes reject empty extractions, but the serializer itself
        // must not fail on a bare header.
        let bytes = to_xlsx(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_column_width_floors_at_header() {
        let rows: Vec<[String; 11]> = sample_records().iter().map(crate::models::record_row).collect();
        // 数量 column holds "3" (1 char) but the header is 2 chars wide.
        assert_eq!(column_width("数量", &rows, 8), 4);
        // 清洗内容 column: "地面、墙面和窗户" is 8 chars, wider than the header.
        assert_eq!(column_width("清洗内容", &rows, 7), 10);
    }

    #[test]
    fn test_csv_has_header_and_duplicated_community() {
        let bytes = to_csv(&sample_records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "师傅,区域,日期,物业,地址,房号,清洗方式,清洗内容,数量,金额,付款方式"
        );
        let row = lines.next().unwrap();
        assert_eq!(row.matches("阳光花园小区").count(), 2);
        assert!(row.ends_with("微信支付。"));
    }

    #[test]
    fn test_content_disposition_is_ascii() {
        let value = content_disposition("cleaning_records.xlsx", XLSX_FILENAME);

        assert!(value.is_ascii());
        assert!(value.starts_with("attachment; filename=\"cleaning_records.xlsx\""));
        assert!(value.contains("filename*=UTF-8''%"));
        assert!(value.ends_with(".xlsx"));
    }
}

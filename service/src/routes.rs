use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::export::{
    self, content_disposition, CSV_CONTENT_TYPE, CSV_FILENAME, XLSX_CONTENT_TYPE, XLSX_FILENAME,
};
use crate::models::{Charts, ExtractRequest, ExtractResponse, Summary};
use extractor::Extraction;

/// Illustrative lines the frontend uses to pre-populate its input area.
pub const SAMPLE_TEXT: &str = "\
张师傅在2023年10月15日为阳光花园小区的1号楼2单元302室进行了深度清洁，清洗方式为湿式清洁，清洗内容包括地面、墙面和窗户，共进行了3次，总金额为300元，付款方式为微信支付。
李师傅在2023年11月20日为绿景小区的2号楼1单元101室进行了日常清洁，清洗方式为干式清洁，清洗内容包括地面和墙面，共进行了2次，总金额为200元，付款方式为支付宝支付。
王师傅在2023年12月5日为金色家园小区的3号楼3单元203室进行了深度清洁，清洗方式为湿式清洁，清洗内容包括地面、墙面和窗户，共进行了4次，总金额为400元，付款方式为现金支付。
赵师傅在2024年1月10日为蓝天海岸小区的5号楼4单元501室进行了精细清洁，清洗方式为湿式清洁，清洗内容包括地面、墙面、窗户和天花板，共进行了1次，总金额为500元，付款方式为银行转账。
刘师傅在2024年2月15日为世纪城小区的8号楼2单元1503室进行了日常清洁，清洗方式为干式清洁，清洗内容包括地面和家具，共进行了2次，总金额为350元，付款方式为支付宝支付。
孙师傅在2024年3月22日为幸福里小区的12号楼3单元601室进行了深度清洁，清洗方式为湿式清洁，清洗内容包括地面、墙面、窗户和卫生间，共进行了3次，总金额为450元，付款方式为微信支付。";

pub fn create_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/sample", get(sample_text))
        .route("/extract", post(run_extraction))
        .route("/export.xlsx", post(export_xlsx))
        .route("/export.csv", post(export_csv))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn sample_text() -> impl IntoResponse {
    (StatusCode::OK, SAMPLE_TEXT)
}

/// Run extraction on request text, mapping the two batch-level failures:
/// empty input is a 400 (the caller should not have submitted it), and
/// non-empty input that yields zero records is a 422 — the whole input was
/// unparseable, which is distinct from the per-line warnings.
fn checked_extract(text: &str) -> Result<Extraction, (StatusCode, String)> {
    if text.trim().is_empty() {
        warn!("rejected empty input");
        return Err((
            StatusCode::BAD_REQUEST,
            "请输入清洗服务记录文本！".to_string(),
        ));
    }

    let extraction = extractor::extract(text);
    info!(
        "extracted {} records, {} line errors",
        extraction.records.len(),
        extraction.errors.len()
    );

    if extraction.records.is_empty() {
        warn!("no records extracted from non-empty input");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "未能解析出任何记录，请检查输入格式！".to_string(),
        ));
    }

    Ok(extraction)
}

#[instrument(skip(req))]
async fn run_extraction(
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, (StatusCode, String)> {
    info!("extraction request: {} bytes of text", req.text.len());
    let extraction = checked_extract(&req.text)?;

    let summary = Summary::from_records(&extraction.records);
    let charts = Charts::from_records(&extraction.records);

    Ok(Json(ExtractResponse {
        records: extraction.records,
        errors: extraction.errors,
        summary,
        charts,
        generated_at: Utc::now(),
    }))
}

#[instrument(skip(req))]
async fn export_xlsx(
    Json(req): Json<ExtractRequest>,
) -> Result<Response, (StatusCode, String)> {
    let extraction = checked_extract(&req.text)?;

    let bytes = export::to_xlsx(&extraction.records).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("导出失败: {}", e),
        )
    })?;

    info!("xlsx export: {} records, {} bytes", extraction.records.len(), bytes.len());
    attachment(bytes, XLSX_CONTENT_TYPE, "cleaning_records.xlsx", XLSX_FILENAME)
}

#[instrument(skip(req))]
async fn export_csv(
    Json(req): Json<ExtractRequest>,
) -> Result<Response, (StatusCode, String)> {
    let extraction = checked_extract(&req.text)?;

    let bytes = export::to_csv(&extraction.records).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("导出失败: {}", e),
        )
    })?;

    info!("csv export: {} records, {} bytes", extraction.records.len(), bytes.len());
    attachment(bytes, CSV_CONTENT_TYPE, "cleaning_records.csv", CSV_FILENAME)
}

fn attachment(
    bytes: Vec<u8>,
    content_type: &str,
    ascii_fallback: &str,
    filename: &str,
) -> Result<Response, (StatusCode, String)> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(ascii_fallback, filename),
        )
        .body(axum::body::Body::from(bytes))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to build response: {}", e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_extract_rejects_empty_input() {
        let (status, _) = checked_extract("   \n  ").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_checked_extract_flags_unparseable_batch() {
        // Every line overflows the amount, so zero records come back even
        // though the input is non-empty.
        let text = "总金额为11111111111111111111元\n总金额为22222222222222222222元";
        let (status, message) = checked_extract(text).unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("未能解析出任何记录"));
    }

    #[test]
    fn test_checked_extract_keeps_warnings_alongside_records() {
        let text = format!("{}\n总金额为11111111111111111111元", SAMPLE_TEXT);
        let extraction = checked_extract(&text).unwrap();

        assert_eq!(extraction.records.len(), 6);
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.errors[0].line, 7);
    }

    #[test]
    fn test_sample_text_parses_cleanly() {
        let extraction = checked_extract(SAMPLE_TEXT).unwrap();

        assert_eq!(extraction.records.len(), 6);
        assert!(extraction.errors.is_empty());
        assert_eq!(extraction.records[5].technician, "孙师傅");
        assert_eq!(extraction.records[5].building_unit, "12号楼3单元");
        assert_eq!(extraction.records[3].amount, 500);
    }
}

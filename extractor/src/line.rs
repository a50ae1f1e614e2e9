//! Per-line record derivation.

use crate::fields;
use crate::types::{FieldError, ServiceRecord};
use tracing::debug;

/// Parse a captured digit run as u32. A missing capture is a plain default
/// (0); a capture the integer type cannot hold is the one conversion that
/// can fail after a successful match, and fails the whole line.
fn parse_count(field: &'static str, captured: Option<String>) -> Result<u32, FieldError> {
    match captured {
        None => Ok(0),
        Some(digits) => digits.parse().map_err(|_| FieldError::InvalidNumber {
            field,
            value: digits,
        }),
    }
}

/// Derive one record from one non-blank line. Field absences resolve to
/// sentinel defaults; only a failed numeric conversion makes the line
/// itself fail.
pub fn derive_record(line: &str) -> Result<ServiceRecord, FieldError> {
    let building = fields::building(line);
    let unit = fields::unit(line);

    let record = ServiceRecord {
        technician: fields::technician(line),
        date: fields::date(line),
        community: fields::community(line),
        building_unit: format!("{}号楼{}单元", building, unit),
        room: fields::room(line),
        cleaning_mode: fields::cleaning_mode(line),
        cleaning_scope: fields::cleaning_scope(line),
        visit_count: parse_count("次数", fields::visit_count(line))?,
        amount: parse_count("金额", fields::amount(line))?,
        payment_method: fields::payment_method(line),
    };

    if record.technician == fields::UNKNOWN {
        debug!("technician not found, line kept with sentinel defaults");
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{UNKNOWN, UNKNOWN_COMMUNITY, UNKNOWN_DATE};

    #[test]
    fn test_derive_full_line() {
        let line = "王师傅在2023年12月5日为金色家园小区的3号楼3单元203室进行了深度清洁，清洗方式为湿式清洁，清洗内容包括地面、墙面和窗户，共进行了4次，总金额为400元，付款方式为现金支付。";
        let record = derive_record(line).unwrap();

        assert_eq!(record.technician, "王师傅");
        assert_eq!(record.date, "2023年12月5日");
        assert_eq!(record.community, "金色家园小区");
        assert_eq!(record.building_unit, "3号楼3单元");
        assert_eq!(record.room, "203室");
        assert_eq!(record.cleaning_mode, "深度清洁");
        assert_eq!(record.cleaning_scope, "地面、墙面和窗户");
        assert_eq!(record.visit_count, 4);
        assert_eq!(record.amount, 400);
        assert_eq!(record.payment_method, "现金支付。");
    }

    #[test]
    fn test_derive_anchor_free_line_defaults_everything() {
        let record = derive_record("random text with no anchors").unwrap();

        assert_eq!(record.technician, UNKNOWN);
        assert_eq!(record.date, UNKNOWN_DATE);
        assert_eq!(record.community, UNKNOWN_COMMUNITY);
        assert_eq!(record.building_unit, "未知号楼未知单元");
        assert_eq!(record.room, UNKNOWN);
        assert_eq!(record.cleaning_mode, UNKNOWN);
        assert_eq!(record.cleaning_scope, UNKNOWN);
        assert_eq!(record.visit_count, 0);
        assert_eq!(record.amount, 0);
        assert_eq!(record.payment_method, UNKNOWN);
    }

    #[test]
    fn test_derive_partial_line_mixes_values_and_defaults() {
        // No payment suffix and no amount segment: those default, the rest
        // still extract.
        let line = "赵师傅在2024年1月10日为蓝天海岸小区的5号楼4单元501室进行了精细清洁，清洗内容包括地面，共进行了1次";
        let record = derive_record(line).unwrap();

        assert_eq!(record.technician, "赵师傅");
        assert_eq!(record.community, "蓝天海岸小区");
        assert_eq!(record.visit_count, 1);
        assert_eq!(record.amount, 0);
        assert_eq!(record.payment_method, UNKNOWN);
    }

    #[test]
    fn test_derive_building_without_unit() {
        let line = "为某某小区的7号楼进行了深度清洁";
        let record = derive_record(line).unwrap();
        assert_eq!(record.building_unit, "7号楼未知单元");
    }

    #[test]
    fn test_amount_overflow_fails_the_line() {
        let line = "张师傅在2023年10月15日为阳光花园小区的1号楼2单元302室进行了深度清洁，清洗内容包括地面，共进行了3次，总金额为99999999999999999999元，付款方式为现金";
        let err = derive_record(line).unwrap_err();
        assert!(err.to_string().contains("金额"));
    }
}

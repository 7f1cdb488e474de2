// ==========================================
// 运营绩效 KPI - 请求校验
// ==========================================
// 职责: year 范围、periodType 取值
// 说明: periodValue 越界不在此拒绝，由周期解析回退到全年
// ==========================================

use std::str::FromStr;

use crate::api::dto::KpiRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{PeriodSelection, PeriodType};

/// 允许的年份范围
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// 校验请求并转换为周期选择
///
/// # 返回
/// - Ok(PeriodSelection): 校验通过（periodType 缺省为 year）
/// - Err(ApiError::InvalidInput): year 越界或 periodType 未知
pub fn validate_request(request: &KpiRequest) -> ApiResult<PeriodSelection> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&request.year) {
        return Err(ApiError::InvalidInput(format!(
            "year={} 超出范围 [{}, {}]",
            request.year, MIN_YEAR, MAX_YEAR
        )));
    }

    let period_type = match request.period_type.as_deref().map(str::trim) {
        None | Some("") => PeriodType::default(),
        Some(raw) => PeriodType::from_str(raw).map_err(ApiError::InvalidInput)?,
    };

    Ok(PeriodSelection::new(request.year, period_type, request.period_value))
}

/// 校验员工 ID 非空
pub fn validate_employee_id(employee_id: &str) -> ApiResult<()> {
    if employee_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("employee_id 不能为空".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(year: i32, period_type: Option<&str>, value: Option<u32>) -> KpiRequest {
        KpiRequest {
            year,
            period_type: period_type.map(|s| s.to_string()),
            period_value: value,
        }
    }

    #[test]
    fn test_year_out_of_range_is_rejected() {
        assert!(matches!(
            validate_request(&request(1999, None, None)),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(validate_request(&request(2100, None, None)).is_ok());
    }

    #[test]
    fn test_period_type_defaults_and_parsing() {
        let selection = validate_request(&request(2025, None, None)).unwrap();
        assert_eq!(selection.period_type, PeriodType::Year);

        let selection = validate_request(&request(2025, Some("Quarter"), Some(2))).unwrap();
        assert_eq!(selection.period_type, PeriodType::Quarter);
        assert_eq!(selection.value, Some(2));

        assert!(validate_request(&request(2025, Some("week"), Some(2))).is_err());
    }

    #[test]
    fn test_out_of_range_value_passes_through() {
        let selection = validate_request(&request(2025, Some("month"), Some(13))).unwrap();
        assert_eq!(selection.value, Some(13));
    }

    #[test]
    fn test_blank_employee_id_is_rejected() {
        assert!(validate_employee_id("  ").is_err());
        assert!(validate_employee_id("E1").is_ok());
    }
}

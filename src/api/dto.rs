// ==========================================
// 运营绩效 KPI - 请求 / 响应 DTO
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::Role;

pub use crate::domain::report::KpiReport as KpiResponse;

/// KPI 查询请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRequest {
    pub year: i32,
    #[serde(default)]
    pub period_type: Option<String>,
    #[serde(default)]
    pub period_value: Option<u32>,
}

impl KpiRequest {
    pub fn new(year: i32, period_type: Option<&str>, period_value: Option<u32>) -> Self {
        Self {
            year,
            period_type: period_type.map(|s| s.to_string()),
            period_value,
        }
    }
}

/// 请求者身份（由外部鉴权解析后传入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub employee_id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(employee_id: impl Into<String>, role: Role) -> Self {
        Self {
            employee_id: employee_id.into(),
            role,
        }
    }
}

// ==========================================
// 运营绩效 KPI - 领域类型定义
// ==========================================
// 职责: 角色 / 周期类型 / 计划状态 等枚举
// 序列化格式: 小写 (与请求/响应契约一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 请求者角色 (Role)
// ==========================================
// employee = 个人贡献者, head = 部门负责人, chief = 管理层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Head,
    Chief,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Head => write!(f, "head"),
            Role::Chief => write!(f, "chief"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "head" => Ok(Role::Head),
            "chief" => Ok(Role::Chief),
            other => Err(format!("未知角色: {}", other)),
        }
    }
}

// ==========================================
// 周期类型 (Period Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Month,
    Quarter,
    Year,
}

impl Default for PeriodType {
    fn default() -> Self {
        PeriodType::Year
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Month => write!(f, "month"),
            PeriodType::Quarter => write!(f, "quarter"),
            PeriodType::Year => write!(f, "year"),
        }
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(PeriodType::Month),
            "quarter" => Ok(PeriodType::Quarter),
            "year" => Ok(PeriodType::Year),
            other => Err(format!("未知周期类型: {}", other)),
        }
    }
}

// ==========================================
// 月度计划状态 (Plan Status)
// ==========================================
// 仅 active / completed 参与 KPI 统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl PlanStatus {
    /// 是否计入 KPI
    pub fn is_countable(&self) -> bool {
        matches!(self, PlanStatus::Active | PlanStatus::Completed)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Draft => write!(f, "draft"),
            PlanStatus::Active => write!(f, "active"),
            PlanStatus::Completed => write!(f, "completed"),
            PlanStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            "cancelled" => Ok(PlanStatus::Cancelled),
            other => Err(format!("未知计划状态: {}", other)),
        }
    }
}

// ==========================================
// 周期选择 (Period Selection)
// ==========================================
/// 请求中的目标周期
///
/// `period_value` 在 month 下为 1-12，在 quarter 下为 1-4；
/// 缺失或越界时按全年处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSelection {
    pub year: i32,
    #[serde(rename = "type")]
    pub period_type: PeriodType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl PeriodSelection {
    pub fn new(year: i32, period_type: PeriodType, value: Option<u32>) -> Self {
        Self {
            year,
            period_type,
            value,
        }
    }

    pub fn year(year: i32) -> Self {
        Self::new(year, PeriodType::Year, None)
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self::new(year, PeriodType::Month, Some(month))
    }

    pub fn quarter(year: i32, quarter: u32) -> Self {
        Self::new(year, PeriodType::Quarter, Some(quarter))
    }
}

/// 月份所属季度 (1-4)
pub fn quarter_of_month(month: u32) -> u32 {
    (month.clamp(1, 12) - 1) / 3 + 1
}

/// 季度包含的 3 个月份
pub fn months_of_quarter(quarter: u32) -> Vec<u32> {
    let q = quarter.clamp(1, 4);
    let first = (q - 1) * 3 + 1;
    (first..first + 3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_and_period_type() {
        assert_eq!("Head".parse::<Role>().unwrap(), Role::Head);
        assert_eq!(" quarter ".parse::<PeriodType>().unwrap(), PeriodType::Quarter);
        assert!("weekly".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_quarter_helpers() {
        assert_eq!(quarter_of_month(1), 1);
        assert_eq!(quarter_of_month(5), 2);
        assert_eq!(quarter_of_month(12), 4);
        assert_eq!(months_of_quarter(3), vec![7, 8, 9]);
    }

    #[test]
    fn test_countable_status() {
        assert!(PlanStatus::Active.is_countable());
        assert!(PlanStatus::Completed.is_countable());
        assert!(!PlanStatus::Draft.is_countable());
        assert!(!PlanStatus::Cancelled.is_countable());
    }
}

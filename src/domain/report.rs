// ==========================================
// 运营绩效 KPI - 输出结构
// ==========================================
// 职责: 交给渲染层的结构化结果（camelCase）
// 红线: 所有工时/百分比字段在此之前已保留 1 位小数
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::{PeriodSelection, Role};

/// 计划 / 实际 / KPI 三元组
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTriple {
    pub planned: f64,
    pub actual: f64,
    pub kpi: f64,
}

/// 流程 / 部门维度行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub department_name: String,
    pub planned: f64,
    pub actual: f64,
    pub kpi: f64,
    /// 按编制与定额推算的建议工时
    pub bench: f64,
}

/// 员工维度行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub department_name: String,
    pub planned: f64,
    pub actual: f64,
    pub kpi: f64,
}

/// 个人计划明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub plan_id: String,
    pub measure_name: String,
    pub process_name: String,
    pub month: u32,
    pub planned: f64,
    pub actual: f64,
    pub kpi: f64,
    pub assignee_count: usize,
    pub task_count: u32,
}

/// 趋势点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// YYYY-MM 或 YYYY-Qn
    pub period: String,
    pub planned: f64,
    pub actual: f64,
    pub kpi: f64,
}

// ==========================================
// KpiReport - 单次请求结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
    pub period: PeriodSelection,
    pub role: Role,
    pub norm: f64,
    pub overall: MetricTriple,
    pub by_process: Vec<GroupRow>,

    // ===== 个人贡献者 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_plans: Option<Vec<PlanRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_trend: Option<Vec<TrendPoint>>,

    // ===== 负责人 / 管理层 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_employee: Option<Vec<EmployeeRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_department: Option<Vec<GroupRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_quarter: Option<Vec<TrendPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_trend: Option<Vec<TrendPoint>>,
}

impl KpiReport {
    /// 主周期无数据时的最小结果
    pub fn empty(period: PeriodSelection, role: Role, norm: f64) -> Self {
        Self {
            period,
            role,
            norm,
            overall: MetricTriple::default(),
            by_process: Vec::new(),
            my_plans: None,
            month_trend: None,
            by_employee: None,
            by_department: None,
            by_quarter: None,
            quarter_trend: None,
        }
    }
}

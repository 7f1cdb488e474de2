// ==========================================
// 运营绩效 KPI - 输入记录模型
// ==========================================
// 职责: 外部计划流程产生的只读记录（按外键扁平关联）
// 红线: 核心不持有、不修改这些记录
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::PlanStatus;

// ==========================================
// PlanningRecord - 月度计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRecord {
    pub id: String,
    pub year: i32,
    pub month: u32,                        // 1-12
    pub planned_hours: Option<f64>,        // 计划工时 (缺失按 0)
    pub quarterly_plan_id: Option<String>, // -> GroupingRecord
    pub measure_id: Option<String>,        // -> MeasureRecord
    pub status: PlanStatus,
}

impl PlanningRecord {
    /// 计划工时（缺失/负值/非有限值按 0）
    pub fn planned(&self) -> f64 {
        match self.planned_hours {
            Some(h) if h.is_finite() && h > 0.0 => h,
            _ => 0.0,
        }
    }

    /// 是否计入 KPI（active / completed）
    pub fn is_countable(&self) -> bool {
        self.status.is_countable()
    }
}

// ==========================================
// GroupingRecord - 季度计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingRecord {
    pub id: String,
    pub department_id: Option<String>,
    pub process_id: Option<String>,
    pub quarter: u32, // 1-4
}

// ==========================================
// MeasureRecord - 措施
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub id: String,
    pub name: String,
    pub process_id: Option<String>,
}

// ==========================================
// ProcessRecord - 流程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: String,
    pub name: String,
    pub department_id: Option<String>,
}

// ==========================================
// DepartmentRecord - 部门
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub id: String,
    pub name: String,
}

// ==========================================
// EmployeeRecord - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub department_id: Option<String>,
}

// ==========================================
// AssignmentRecord - 计划执行人 (多对多)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub plan_id: String,
    pub employee_id: String,
}

// ==========================================
// TaskHoursRecord - 实际工时汇总
// ==========================================
// 同一 (plan, employee) 可能有多行，需累加
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHoursRecord {
    pub plan_id: String,
    pub employee_id: String,
    pub hours: f64,
    pub task_count: u32,
}

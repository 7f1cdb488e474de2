// ==========================================
// 运营绩效 KPI - 组织层级解析
// ==========================================
// 职责: 为月度计划解析所属部门 / 流程（按顺序回退）
// 部门: 季度计划.部门 -> 措施.流程.部门
// 流程: 季度计划.流程 -> 措施.流程
// 说明: 全部失败时归入"未分组"桶，不视为错误
// ==========================================

use crate::domain::records::{DepartmentRecord, PlanningRecord, ProcessRecord};
use crate::domain::snapshot::SnapshotIndex;

/// 未分组桶的 ID
pub const UNGROUPED_ID: &str = "ungrouped";

/// 解析部门
pub fn resolve_department<'a>(
    index: &SnapshotIndex<'a>,
    plan: &PlanningRecord,
) -> Option<&'a DepartmentRecord> {
    let via_grouping = || {
        let grouping = index.grouping(plan.quarterly_plan_id.as_deref()?)?;
        index.department(grouping.department_id.as_deref()?)
    };
    let via_measure = || {
        let measure = index.measure(plan.measure_id.as_deref()?)?;
        let process = index.process(measure.process_id.as_deref()?)?;
        index.department(process.department_id.as_deref()?)
    };

    via_grouping().or_else(via_measure)
}

/// 解析流程
pub fn resolve_process<'a>(
    index: &SnapshotIndex<'a>,
    plan: &PlanningRecord,
) -> Option<&'a ProcessRecord> {
    let via_grouping = || {
        let grouping = index.grouping(plan.quarterly_plan_id.as_deref()?)?;
        index.process(grouping.process_id.as_deref()?)
    };
    let via_measure = || {
        let measure = index.measure(plan.measure_id.as_deref()?)?;
        index.process(measure.process_id.as_deref()?)
    };

    via_grouping().or_else(via_measure)
}

// ==========================================
// Placement - 单条计划的解析结果
// ==========================================
/// 每条计划只解析一次，聚合阶段复用
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub plan: &'a PlanningRecord,
    pub department: Option<&'a DepartmentRecord>,
    pub process: Option<&'a ProcessRecord>,
}

impl<'a> Placement<'a> {
    pub fn resolve(index: &SnapshotIndex<'a>, plan: &'a PlanningRecord) -> Self {
        Self {
            plan,
            department: resolve_department(index, plan),
            process: resolve_process(index, plan),
        }
    }

    /// 部门分组键（未解析时为 "ungrouped"）
    pub fn department_key(&self) -> &'a str {
        self.department.map(|d| d.id.as_str()).unwrap_or(UNGROUPED_ID)
    }

    /// 流程分组键（未解析时为 "ungrouped"）
    pub fn process_key(&self) -> &'a str {
        self.process.map(|p| p.id.as_str()).unwrap_or(UNGROUPED_ID)
    }
}

/// 批量解析
pub fn place_all<'a>(index: &SnapshotIndex<'a>, plans: &[&'a PlanningRecord]) -> Vec<Placement<'a>> {
    plans.iter().map(|&p| Placement::resolve(index, p)).collect()
}

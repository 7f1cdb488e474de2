// ==========================================
// 运营绩效 KPI - 记录快照与索引
// ==========================================
// 职责: 单次请求的 8 类记录集合 + 一次性建立的查找表
// 说明: 索引在任何解析/聚合之前构建，且只在本次请求内有效
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::records::{
    AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, MeasureRecord,
    PlanningRecord, ProcessRecord, TaskHoursRecord,
};

// ==========================================
// RecordSnapshot - 请求级快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub plans: Vec<PlanningRecord>,
    pub groupings: Vec<GroupingRecord>,
    pub task_hours: Vec<TaskHoursRecord>,
    pub assignments: Vec<AssignmentRecord>,
    pub measures: Vec<MeasureRecord>,
    pub processes: Vec<ProcessRecord>,
    pub departments: Vec<DepartmentRecord>,
    pub employees: Vec<EmployeeRecord>,
}

/// (计划, 员工) 维度的实际工时累计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoggedHours {
    pub hours: f64,
    pub task_count: u32,
}

// ==========================================
// SnapshotIndex - 查找表
// ==========================================
/// 快照索引
///
/// - 计划只保留可计入状态 (active / completed)，保持快照原始顺序
/// - 执行人列表按首次出现顺序去重
/// - 同一 (计划, 员工) 的多行实际工时在此累加（未取整）
pub struct SnapshotIndex<'a> {
    plans: Vec<&'a PlanningRecord>,
    groupings: HashMap<&'a str, &'a GroupingRecord>,
    measures: HashMap<&'a str, &'a MeasureRecord>,
    processes: HashMap<&'a str, &'a ProcessRecord>,
    departments: HashMap<&'a str, &'a DepartmentRecord>,
    employees: HashMap<&'a str, &'a EmployeeRecord>,
    assignees: HashMap<&'a str, Vec<&'a str>>,
    logged: HashMap<(&'a str, &'a str), LoggedHours>,
    plan_actual: HashMap<&'a str, f64>,
}

impl<'a> SnapshotIndex<'a> {
    /// 从快照构建索引
    pub fn build(snapshot: &'a RecordSnapshot) -> Self {
        let plans: Vec<&PlanningRecord> = snapshot
            .plans
            .iter()
            .filter(|p| p.is_countable())
            .collect();

        let groupings = snapshot.groupings.iter().map(|g| (g.id.as_str(), g)).collect();
        let measures = snapshot.measures.iter().map(|m| (m.id.as_str(), m)).collect();
        let processes = snapshot.processes.iter().map(|p| (p.id.as_str(), p)).collect();
        let departments = snapshot
            .departments
            .iter()
            .map(|d| (d.id.as_str(), d))
            .collect();
        let employees = snapshot.employees.iter().map(|e| (e.id.as_str(), e)).collect();

        let mut assignees: HashMap<&str, Vec<&str>> = HashMap::new();
        for a in &snapshot.assignments {
            let list = assignees.entry(a.plan_id.as_str()).or_default();
            if !list.contains(&a.employee_id.as_str()) {
                list.push(a.employee_id.as_str());
            }
        }

        let mut logged: HashMap<(&str, &str), LoggedHours> = HashMap::new();
        let mut plan_actual: HashMap<&str, f64> = HashMap::new();
        for row in &snapshot.task_hours {
            let hours = if row.hours.is_finite() { row.hours } else { 0.0 };
            let entry = logged
                .entry((row.plan_id.as_str(), row.employee_id.as_str()))
                .or_default();
            entry.hours += hours;
            entry.task_count += row.task_count;
            *plan_actual.entry(row.plan_id.as_str()).or_default() += hours;
        }

        Self {
            plans,
            groupings,
            measures,
            processes,
            departments,
            employees,
            assignees,
            logged,
            plan_actual,
        }
    }

    /// 可计入的计划（快照顺序）
    pub fn plans(&self) -> &[&'a PlanningRecord] {
        &self.plans
    }

    /// 指定月份集合内的可计入计划
    pub fn plans_in_months(&self, year: i32, months: &[u32]) -> Vec<&'a PlanningRecord> {
        self.plans
            .iter()
            .copied()
            .filter(|p| p.year == year && months.contains(&p.month))
            .collect()
    }

    pub fn grouping(&self, id: &str) -> Option<&'a GroupingRecord> {
        self.groupings.get(id).copied()
    }

    pub fn measure(&self, id: &str) -> Option<&'a MeasureRecord> {
        self.measures.get(id).copied()
    }

    pub fn process(&self, id: &str) -> Option<&'a ProcessRecord> {
        self.processes.get(id).copied()
    }

    pub fn department(&self, id: &str) -> Option<&'a DepartmentRecord> {
        self.departments.get(id).copied()
    }

    pub fn employee(&self, id: &str) -> Option<&'a EmployeeRecord> {
        self.employees.get(id).copied()
    }

    /// 计划的执行人（去重，首次出现顺序）
    pub fn assignees(&self, plan_id: &str) -> &[&'a str] {
        self.assignees
            .get(plan_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_assigned(&self, plan_id: &str, employee_id: &str) -> bool {
        self.assignees(plan_id).contains(&employee_id)
    }

    /// 某员工在某计划上的实际工时
    pub fn logged(&self, plan_id: &str, employee_id: &str) -> LoggedHours {
        self.logged
            .get(&(plan_id, employee_id))
            .copied()
            .unwrap_or_default()
    }

    /// 某计划的全部实际工时（所有员工）
    pub fn plan_actual(&self, plan_id: &str) -> f64 {
        self.plan_actual.get(plan_id).copied().unwrap_or(0.0)
    }
}

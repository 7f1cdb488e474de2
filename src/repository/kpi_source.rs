// ==========================================
// 运营绩效 KPI - 数据源接口
// ==========================================
// 职责: 定义 8 类记录的读取接口（不包含实现）
// 说明: 由调用方注入，核心不感知存储技术
// 实现者: SqliteKpiSource, InMemoryKpiSource
// ==========================================

use async_trait::async_trait;

use crate::domain::records::{
    AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, MeasureRecord,
    PlanningRecord, ProcessRecord, TaskHoursRecord,
};
use crate::repository::error::RepositoryResult;

/// 取数范围：年份 + 月份集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub year: i32,
    pub months: Vec<u32>,
}

impl SnapshotQuery {
    pub fn new(year: i32, months: Vec<u32>) -> Self {
        Self { year, months }
    }
}

// ==========================================
// KpiDataSource Trait
// ==========================================
// 8 个读取相互独立，调用方并发发起
#[async_trait]
pub trait KpiDataSource: Send + Sync {
    /// 月度计划（仅 active / completed，限定年份与月份）
    async fn fetch_plans(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<PlanningRecord>>;

    /// 季度计划
    async fn fetch_groupings(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<GroupingRecord>>;

    /// 实际工时（限定在范围内计划上）
    async fn fetch_task_hours(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<TaskHoursRecord>>;

    /// 计划执行人（限定在范围内计划上）
    async fn fetch_assignments(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<AssignmentRecord>>;

    /// 措施
    async fn fetch_measures(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<MeasureRecord>>;

    /// 流程
    async fn fetch_processes(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<ProcessRecord>>;

    /// 部门
    async fn fetch_departments(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<DepartmentRecord>>;

    /// 员工
    async fn fetch_employees(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<EmployeeRecord>>;
}

// ==========================================
// 运营绩效 KPI - 内存数据源
// ==========================================
// 用途: 测试 / 演示 / 调用方已持有记录时直接注入
// 过滤规则与 SqliteKpiSource 保持一致
// ==========================================

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::records::{
    AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, MeasureRecord,
    PlanningRecord, ProcessRecord, TaskHoursRecord,
};
use crate::domain::snapshot::RecordSnapshot;
use crate::repository::error::RepositoryResult;
use crate::repository::kpi_source::{KpiDataSource, SnapshotQuery};

pub struct InMemoryKpiSource {
    snapshot: RecordSnapshot,
}

impl InMemoryKpiSource {
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self { snapshot }
    }

    fn plan_in_scope(plan: &PlanningRecord, query: &SnapshotQuery) -> bool {
        plan.year == query.year && query.months.contains(&plan.month) && plan.is_countable()
    }

    fn scoped_plan_ids(&self, query: &SnapshotQuery) -> HashSet<&str> {
        self.snapshot
            .plans
            .iter()
            .filter(|p| Self::plan_in_scope(p, query))
            .map(|p| p.id.as_str())
            .collect()
    }
}

#[async_trait]
impl KpiDataSource for InMemoryKpiSource {
    async fn fetch_plans(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<PlanningRecord>> {
        Ok(self
            .snapshot
            .plans
            .iter()
            .filter(|p| Self::plan_in_scope(p, query))
            .cloned()
            .collect())
    }

    async fn fetch_groupings(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<GroupingRecord>> {
        Ok(self.snapshot.groupings.clone())
    }

    async fn fetch_task_hours(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<TaskHoursRecord>> {
        let ids = self.scoped_plan_ids(query);
        Ok(self
            .snapshot
            .task_hours
            .iter()
            .filter(|t| ids.contains(t.plan_id.as_str()))
            .cloned()
            .collect())
    }

    async fn fetch_assignments(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<AssignmentRecord>> {
        let ids = self.scoped_plan_ids(query);
        Ok(self
            .snapshot
            .assignments
            .iter()
            .filter(|a| ids.contains(a.plan_id.as_str()))
            .cloned()
            .collect())
    }

    async fn fetch_measures(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<MeasureRecord>> {
        Ok(self.snapshot.measures.clone())
    }

    async fn fetch_processes(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<ProcessRecord>> {
        Ok(self.snapshot.processes.clone())
    }

    async fn fetch_departments(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<DepartmentRecord>> {
        Ok(self.snapshot.departments.clone())
    }

    async fn fetch_employees(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<EmployeeRecord>> {
        Ok(self.snapshot.employees.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PlanStatus;

    fn plan(id: &str, month: u32, status: PlanStatus) -> PlanningRecord {
        PlanningRecord {
            id: id.into(),
            year: 2025,
            month,
            planned_hours: Some(8.0),
            quarterly_plan_id: None,
            measure_id: None,
            status,
        }
    }

    #[tokio::test]
    async fn test_filters_match_plan_scope() {
        let source = InMemoryKpiSource::new(RecordSnapshot {
            plans: vec![
                plan("P1", 3, PlanStatus::Active),
                plan("P2", 3, PlanStatus::Cancelled),
                plan("P3", 7, PlanStatus::Completed),
            ],
            task_hours: vec![
                TaskHoursRecord { plan_id: "P1".into(), employee_id: "E1".into(), hours: 2.0, task_count: 1 },
                TaskHoursRecord { plan_id: "P2".into(), employee_id: "E1".into(), hours: 5.0, task_count: 1 },
            ],
            ..Default::default()
        });

        let query = SnapshotQuery::new(2025, vec![1, 2, 3]);
        let plans = source.fetch_plans(&query).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, "P1");

        let hours = source.fetch_task_hours(&query).await.unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].plan_id, "P1");
    }
}

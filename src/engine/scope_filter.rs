// ==========================================
// 运营绩效 KPI - 角色可见范围过滤
// ==========================================
// 个人贡献者: 仅本人被指派的计划
// 部门负责人: 仅解析部门 == 本人部门的计划
// 管理层:     全部计划
// 说明: 月份限定由调用方传入的记录集决定（主周期 / 上下文）
// ==========================================

use crate::domain::snapshot::SnapshotIndex;
use crate::domain::types::Role;
use crate::engine::hierarchy::Placement;

/// 角色范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    IndividualContributor { employee_id: String },
    TeamLead { department_id: Option<String> },
    Executive,
}

impl RoleScope {
    /// 按请求者身份构建范围
    ///
    /// 负责人的部门取自其员工记录；找不到时范围为空
    pub fn for_caller(role: Role, employee_id: &str, index: &SnapshotIndex<'_>) -> Self {
        match role {
            Role::Employee => RoleScope::IndividualContributor {
                employee_id: employee_id.to_string(),
            },
            Role::Head => RoleScope::TeamLead {
                department_id: index
                    .employee(employee_id)
                    .and_then(|e| e.department_id.clone()),
            },
            Role::Chief => RoleScope::Executive,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleScope::IndividualContributor { .. } => Role::Employee,
            RoleScope::TeamLead { .. } => Role::Head,
            RoleScope::Executive => Role::Chief,
        }
    }

    /// 个人视图下的员工 ID
    pub fn employee_id(&self) -> Option<&str> {
        match self {
            RoleScope::IndividualContributor { employee_id } => Some(employee_id),
            _ => None,
        }
    }

    /// 单条计划是否可见
    pub fn admits(&self, placement: &Placement<'_>, index: &SnapshotIndex<'_>) -> bool {
        match self {
            RoleScope::IndividualContributor { employee_id } => {
                index.is_assigned(&placement.plan.id, employee_id)
            }
            RoleScope::TeamLead { department_id } => match (department_id, placement.department) {
                (Some(own), Some(dept)) => dept.id == *own,
                _ => false,
            },
            RoleScope::Executive => true,
        }
    }

    /// 过滤记录集（保持原顺序）
    pub fn filter<'a>(
        &self,
        placements: &[Placement<'a>],
        index: &SnapshotIndex<'a>,
    ) -> Vec<Placement<'a>> {
        placements
            .iter()
            .filter(|p| self.admits(p, index))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{
        AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, PlanningRecord,
    };
    use crate::domain::snapshot::RecordSnapshot;
    use crate::domain::types::PlanStatus;
    use crate::engine::hierarchy::place_all;

    fn plan(id: &str, grouping: &str) -> PlanningRecord {
        PlanningRecord {
            id: id.into(),
            year: 2025,
            month: 3,
            planned_hours: Some(10.0),
            quarterly_plan_id: Some(grouping.into()),
            measure_id: None,
            status: PlanStatus::Active,
        }
    }

    fn snapshot() -> RecordSnapshot {
        RecordSnapshot {
            plans: vec![plan("P1", "QA"), plan("P2", "QB"), plan("P3", "QX")],
            groupings: vec![
                GroupingRecord { id: "QA".into(), department_id: Some("DA".into()), process_id: None, quarter: 1 },
                GroupingRecord { id: "QB".into(), department_id: Some("DB".into()), process_id: None, quarter: 1 },
            ],
            departments: vec![
                DepartmentRecord { id: "DA".into(), name: "A".into() },
                DepartmentRecord { id: "DB".into(), name: "B".into() },
            ],
            employees: vec![
                EmployeeRecord { id: "E1".into(), name: "Ann".into(), department_id: Some("DA".into()) },
                EmployeeRecord { id: "H1".into(), name: "Bob".into(), department_id: Some("DB".into()) },
            ],
            assignments: vec![
                AssignmentRecord { plan_id: "P1".into(), employee_id: "E1".into() },
                AssignmentRecord { plan_id: "P3".into(), employee_id: "E1".into() },
            ],
            ..Default::default()
        }
    }

    fn ids(placements: &[Placement<'_>]) -> Vec<String> {
        placements.iter().map(|p| p.plan.id.clone()).collect()
    }

    #[test]
    fn test_individual_sees_assigned_plans_only() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::for_caller(Role::Employee, "E1", &index);
        assert_eq!(ids(&scope.filter(&placements, &index)), vec!["P1", "P3"]);
    }

    #[test]
    fn test_team_lead_sees_own_department() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::for_caller(Role::Head, "H1", &index);
        assert_eq!(scope, RoleScope::TeamLead { department_id: Some("DB".into()) });
        assert_eq!(ids(&scope.filter(&placements, &index)), vec!["P2"]);
    }

    #[test]
    fn test_team_lead_without_department_sees_nothing() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::for_caller(Role::Head, "unknown", &index);
        assert!(scope.filter(&placements, &index).is_empty());
    }

    #[test]
    fn test_executive_sees_everything() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::for_caller(Role::Chief, "C1", &index);
        assert_eq!(scope.filter(&placements, &index).len(), 3);
        assert_eq!(scope.role(), Role::Chief);
    }
}

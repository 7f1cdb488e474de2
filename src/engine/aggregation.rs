// ==========================================
// 运营绩效 KPI - 指标聚合引擎
// ==========================================
// 职责: 按流程 / 部门 / 员工分组，累加计划与实际工时，计算 KPI 与 bench
// 红线: 累加使用未取整值，只在生成输出行时取整
// 红线: 分组顺序 = 首次出现顺序，排序为稳定排序（保证幂等）
// ==========================================
// bench（建议工时）:
// - 流程行: 员工在同一部门内参与 N 个流程时，每个流程分得 定额工时 / N
// - 部门行: 去重员工数 * 定额工时
// 拆分键为 (员工, 部门)，同一部门内所有流程的 bench 之和 = 人数 * 定额工时
// ==========================================

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::report::{EmployeeRow, GroupRow, MetricTriple, PlanRow};
use crate::domain::snapshot::SnapshotIndex;
use crate::engine::hierarchy::Placement;
use crate::engine::metric_math::{hours, kpi};
use crate::engine::scope_filter::RoleScope;

/// 未取整的计划 / 实际累计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub planned: f64,
    pub actual: f64,
}

impl Totals {
    pub fn add(&mut self, planned: f64, actual: f64) {
        self.planned += planned;
        self.actual += actual;
    }

    /// 取整后的输出三元组
    pub fn to_triple(self) -> MetricTriple {
        MetricTriple {
            planned: hours(self.planned),
            actual: hours(self.actual),
            kpi: kpi(self.actual, self.planned),
        }
    }
}

/// 按键分组，保持首次出现顺序
pub fn group_by<'a, F>(placements: &[Placement<'a>], key: F) -> Vec<(&'a str, Vec<Placement<'a>>)>
where
    F: Fn(&Placement<'a>) -> &'a str,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<Placement<'a>>)> = Vec::new();

    for placement in placements {
        let k = key(placement);
        match slots.get(k) {
            Some(&i) => groups[i].1.push(*placement),
            None => {
                slots.insert(k, groups.len());
                groups.push((k, vec![*placement]));
            }
        }
    }

    groups
}

/// 降序稳定排序
fn sort_desc_by<T, F>(rows: &mut [T], field: F)
where
    F: Fn(&T) -> f64,
{
    rows.sort_by(|a, b| field(b).partial_cmp(&field(a)).unwrap_or(Ordering::Equal));
}

// ==========================================
// MetricAggregator - 聚合器
// ==========================================
pub struct MetricAggregator<'i, 'a> {
    index: &'i SnapshotIndex<'a>,
    scope: &'i RoleScope,
    ungrouped_label: &'i str,
}

impl<'i, 'a> MetricAggregator<'i, 'a> {
    pub fn new(index: &'i SnapshotIndex<'a>, scope: &'i RoleScope, ungrouped_label: &'i str) -> Self {
        Self {
            index,
            scope,
            ungrouped_label,
        }
    }

    /// 单条计划的实际工时
    ///
    /// 个人视图只计本人工时，其余视图计全部执行人工时
    pub fn actual_of(&self, placement: &Placement<'_>) -> f64 {
        match self.scope.employee_id() {
            Some(me) => self.index.logged(&placement.plan.id, me).hours,
            None => self.index.plan_actual(&placement.plan.id),
        }
    }

    /// 按记录累加（计划工时取自记录）
    pub fn totals(&self, placements: &[Placement<'_>]) -> Totals {
        let mut totals = Totals::default();
        for p in placements {
            totals.add(p.plan.planned(), self.actual_of(p));
        }
        totals
    }

    /// 总览
    ///
    /// 个人视图的计划基线为 `personal_norm_hours`，而非记录中的计划工时
    pub fn overall(&self, placements: &[Placement<'_>], personal_norm_hours: f64) -> MetricTriple {
        let mut totals = self.totals(placements);
        if self.scope.employee_id().is_some() {
            totals.planned = personal_norm_hours;
        }
        totals.to_triple()
    }

    // ==========================================
    // 流程维度
    // ==========================================

    /// 按流程分组（按计划工时降序）
    pub fn by_process(&self, placements: &[Placement<'a>], personal_norm_hours: f64) -> Vec<GroupRow> {
        let spread = ProcessSpread::build(self.index, placements);

        let mut rows: Vec<GroupRow> = group_by(placements, |p| p.process_key())
            .into_iter()
            .map(|(key, members)| {
                let totals = self.totals(&members);
                let first = members[0];

                let mut seen: HashSet<(&str, &str)> = HashSet::new();
                let mut bench = 0.0;
                for m in &members {
                    let dept = m.department_key();
                    for &emp in self.index.assignees(&m.plan.id) {
                        if seen.insert((emp, dept)) {
                            bench += personal_norm_hours / spread.count(emp, dept) as f64;
                        }
                    }
                }

                GroupRow {
                    id: key.to_string(),
                    name: first
                        .process
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| self.ungrouped_label.to_string()),
                    department_name: self.department_name(&first),
                    planned: hours(totals.planned),
                    actual: hours(totals.actual),
                    kpi: kpi(totals.actual, totals.planned),
                    bench: hours(bench),
                }
            })
            .collect();

        sort_desc_by(&mut rows, |r| r.planned);
        rows
    }

    // ==========================================
    // 部门维度
    // ==========================================

    /// 按部门分组（按计划工时降序）
    pub fn by_department(&self, placements: &[Placement<'a>], personal_norm_hours: f64) -> Vec<GroupRow> {
        let mut rows: Vec<GroupRow> = group_by(placements, |p| p.department_key())
            .into_iter()
            .map(|(key, members)| {
                let totals = self.totals(&members);
                let employees: HashSet<&str> = members
                    .iter()
                    .flat_map(|m| self.index.assignees(&m.plan.id).iter().copied())
                    .collect();
                let name = self.department_name(&members[0]);

                GroupRow {
                    id: key.to_string(),
                    name: name.clone(),
                    department_name: name,
                    planned: hours(totals.planned),
                    actual: hours(totals.actual),
                    kpi: kpi(totals.actual, totals.planned),
                    bench: hours(employees.len() as f64 * personal_norm_hours),
                }
            })
            .collect();

        sort_desc_by(&mut rows, |r| r.planned);
        rows
    }

    // ==========================================
    // 员工维度
    // ==========================================

    /// 按员工分组（按 KPI 降序）
    ///
    /// 计划工时在执行人之间平均分摊，实际工时为员工本人工时
    pub fn by_employee(&self, placements: &[Placement<'a>]) -> Vec<EmployeeRow> {
        let mut order: Vec<&str> = Vec::new();
        let mut totals: HashMap<&str, Totals> = HashMap::new();

        for p in placements {
            let assignees = self.index.assignees(&p.plan.id);
            if assignees.is_empty() {
                continue;
            }
            let share = p.plan.planned() / assignees.len() as f64;
            for &emp in assignees {
                let entry = totals.entry(emp).or_insert_with(|| {
                    order.push(emp);
                    Totals::default()
                });
                entry.add(share, self.index.logged(&p.plan.id, emp).hours);
            }
        }

        let mut rows: Vec<EmployeeRow> = order
            .into_iter()
            .map(|emp| {
                let t = totals.get(emp).copied().unwrap_or_default();
                let record = self.index.employee(emp);
                EmployeeRow {
                    id: emp.to_string(),
                    name: record.map(|e| e.name.clone()).unwrap_or_else(|| emp.to_string()),
                    department_name: record
                        .and_then(|e| e.department_id.as_deref())
                        .and_then(|d| self.index.department(d))
                        .map(|d| d.name.clone())
                        .unwrap_or_else(|| self.ungrouped_label.to_string()),
                    planned: hours(t.planned),
                    actual: hours(t.actual),
                    kpi: kpi(t.actual, t.planned),
                }
            })
            .collect();

        sort_desc_by(&mut rows, |r| r.kpi);
        rows
    }

    // ==========================================
    // 个人计划明细
    // ==========================================

    /// 本人计划明细（按月份升序）
    pub fn my_plans(&self, placements: &[Placement<'a>], employee_id: &str) -> Vec<PlanRow> {
        let mut rows: Vec<PlanRow> = placements
            .iter()
            .map(|p| {
                let logged = self.index.logged(&p.plan.id, employee_id);
                let planned = p.plan.planned();
                PlanRow {
                    plan_id: p.plan.id.clone(),
                    measure_name: p
                        .plan
                        .measure_id
                        .as_deref()
                        .and_then(|id| self.index.measure(id))
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| self.ungrouped_label.to_string()),
                    process_name: p
                        .process
                        .map(|pr| pr.name.clone())
                        .unwrap_or_else(|| self.ungrouped_label.to_string()),
                    month: p.plan.month,
                    planned: hours(planned),
                    actual: hours(logged.hours),
                    kpi: kpi(logged.hours, planned),
                    assignee_count: self.index.assignees(&p.plan.id).len(),
                    task_count: logged.task_count,
                }
            })
            .collect();

        rows.sort_by_key(|r| r.month);
        rows
    }

    fn department_name(&self, placement: &Placement<'_>) -> String {
        placement
            .department
            .map(|d| d.name.clone())
            .unwrap_or_else(|| self.ungrouped_label.to_string())
    }
}

// ==========================================
// ProcessSpread - 员工在部门内参与的流程数
// ==========================================
/// (员工, 部门) -> 去重流程集合
struct ProcessSpread<'a> {
    processes: HashMap<(&'a str, &'a str), HashSet<&'a str>>,
}

impl<'a> ProcessSpread<'a> {
    fn build(index: &SnapshotIndex<'a>, placements: &[Placement<'a>]) -> Self {
        let mut processes: HashMap<(&'a str, &'a str), HashSet<&'a str>> = HashMap::new();
        for p in placements {
            for &emp in index.assignees(&p.plan.id) {
                processes
                    .entry((emp, p.department_key()))
                    .or_default()
                    .insert(p.process_key());
            }
        }
        Self { processes }
    }

    fn count(&self, employee_id: &str, department_key: &str) -> usize {
        self.processes
            .get(&(employee_id, department_key))
            .map(|s| s.len())
            .unwrap_or(1)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{
        AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, PlanningRecord,
        ProcessRecord, TaskHoursRecord,
    };
    use crate::domain::snapshot::RecordSnapshot;
    use crate::domain::types::PlanStatus;
    use crate::engine::hierarchy::place_all;

    fn plan(id: &str, grouping: &str, planned: f64) -> PlanningRecord {
        PlanningRecord {
            id: id.into(),
            year: 2025,
            month: 2,
            planned_hours: Some(planned),
            quarterly_plan_id: Some(grouping.into()),
            measure_id: None,
            status: PlanStatus::Active,
        }
    }

    fn grouping(id: &str, dept: &str, process: &str) -> GroupingRecord {
        GroupingRecord {
            id: id.into(),
            department_id: Some(dept.into()),
            process_id: Some(process.into()),
            quarter: 1,
        }
    }

    fn assign(plan: &str, emp: &str) -> AssignmentRecord {
        AssignmentRecord { plan_id: plan.into(), employee_id: emp.into() }
    }

    fn logged(plan: &str, emp: &str, hours: f64) -> TaskHoursRecord {
        TaskHoursRecord { plan_id: plan.into(), employee_id: emp.into(), hours, task_count: 1 }
    }

    /// 部门 D1: 流程 PA / PB；部门 D2: 流程 PC
    /// E1 参与 PA + PB，E2 参与 PA，E3 参与 PC
    fn snapshot() -> RecordSnapshot {
        RecordSnapshot {
            plans: vec![
                plan("P1", "G-A", 40.0),
                plan("P2", "G-B", 60.0),
                plan("P3", "G-C", 20.0),
            ],
            groupings: vec![
                grouping("G-A", "D1", "PA"),
                grouping("G-B", "D1", "PB"),
                grouping("G-C", "D2", "PC"),
            ],
            processes: vec![
                ProcessRecord { id: "PA".into(), name: "Process A".into(), department_id: Some("D1".into()) },
                ProcessRecord { id: "PB".into(), name: "Process B".into(), department_id: Some("D1".into()) },
                ProcessRecord { id: "PC".into(), name: "Process C".into(), department_id: Some("D2".into()) },
            ],
            departments: vec![
                DepartmentRecord { id: "D1".into(), name: "Dept 1".into() },
                DepartmentRecord { id: "D2".into(), name: "Dept 2".into() },
            ],
            employees: vec![
                EmployeeRecord { id: "E1".into(), name: "Ann".into(), department_id: Some("D1".into()) },
                EmployeeRecord { id: "E2".into(), name: "Ben".into(), department_id: Some("D1".into()) },
                EmployeeRecord { id: "E3".into(), name: "Cid".into(), department_id: Some("D2".into()) },
            ],
            assignments: vec![
                assign("P1", "E1"),
                assign("P1", "E2"),
                assign("P2", "E1"),
                assign("P3", "E3"),
            ],
            task_hours: vec![
                logged("P1", "E1", 10.0),
                logged("P1", "E2", 20.0),
                logged("P2", "E1", 30.0),
                logged("P3", "E3", 25.0),
            ],
            ..Default::default()
        }
    }

    const NORM_HOURS: f64 = 100.0;

    #[test]
    fn test_by_process_sorted_by_planned_with_split_bench() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let rows = agg.by_process(&placements, NORM_HOURS);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["PB", "PA", "PC"]);

        let pa = &rows[1];
        assert_eq!(pa.planned, 40.0);
        assert_eq!(pa.actual, 30.0);
        assert_eq!(pa.kpi, 75.0);
        assert_eq!(pa.department_name, "Dept 1");
        // E1 分摊一半 + E2 全部
        assert_eq!(pa.bench, 150.0);
        assert_eq!(rows[0].bench, 50.0);
        assert_eq!(rows[2].bench, 100.0);
    }

    #[test]
    fn test_bench_conservation_per_department() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let processes = agg.by_process(&placements, NORM_HOURS);
        let d1_sum: f64 = processes
            .iter()
            .filter(|r| r.department_name == "Dept 1")
            .map(|r| r.bench)
            .sum();

        let departments = agg.by_department(&placements, NORM_HOURS);
        let d1 = departments.iter().find(|r| r.id == "D1").unwrap();
        assert_eq!(d1.bench, 2.0 * NORM_HOURS);
        assert!((d1_sum - d1.bench).abs() < 1e-9);
    }

    #[test]
    fn test_by_department_totals() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let rows = agg.by_department(&placements, NORM_HOURS);
        assert_eq!(rows[0].id, "D1");
        assert_eq!(rows[0].planned, 100.0);
        assert_eq!(rows[0].actual, 60.0);
        assert_eq!(rows[0].kpi, 60.0);
        assert_eq!(rows[1].name, "Dept 2");
        assert_eq!(rows[1].bench, 100.0);
    }

    #[test]
    fn test_by_employee_splits_planned_and_sorts_by_kpi() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let rows = agg.by_employee(&placements);
        // E3: 25/20 = 125%，E2: 20/20 = 100%，E1: 40/80 = 50%
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["E3", "E2", "E1"]);
        let e1 = &rows[2];
        assert_eq!(e1.planned, 80.0);
        assert_eq!(e1.actual, 40.0);
        assert_eq!(e1.name, "Ann");
        assert_eq!(e1.department_name, "Dept 1");
    }

    #[test]
    fn test_individual_overall_uses_norm_baseline() {
        let mut snapshot = snapshot();
        snapshot.plans[1].planned_hours = None;
        snapshot.task_hours = vec![logged("P1", "E1", 10.0), logged("P2", "E1", 25.0), logged("P1", "E2", 99.0)];
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::IndividualContributor { employee_id: "E1".into() };
        let mine = scope.filter(&placements, &index);
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let overall = agg.overall(&mine, 140.0);
        assert_eq!(overall, MetricTriple { planned: 140.0, actual: 35.0, kpi: 25.0 });

        let plans = agg.my_plans(&mine, "E1");
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].assignee_count, 2);
        assert_eq!(plans[1].planned, 0.0);
        assert_eq!(plans[1].kpi, 0.0);
        assert_eq!(plans[0].measure_name, "Unassigned");
        assert_eq!(plans[0].process_name, "Process A");
    }

    #[test]
    fn test_ungrouped_bucket() {
        let mut snapshot = snapshot();
        snapshot.plans[2].quarterly_plan_id = None;
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let rows = agg.by_process(&placements, NORM_HOURS);
        let ungrouped = rows.iter().find(|r| r.id == "ungrouped").unwrap();
        assert_eq!(ungrouped.name, "Unassigned");
        assert_eq!(ungrouped.department_name, "Unassigned");
        assert_eq!(ungrouped.planned, 20.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let snapshot = snapshot();
        let index = SnapshotIndex::build(&snapshot);
        let placements = place_all(&index, index.plans());
        let scope = RoleScope::Executive;
        let agg = MetricAggregator::new(&index, &scope, "Unassigned");

        let first = serde_json::to_string(&agg.by_process(&placements, NORM_HOURS)).unwrap();
        let second = serde_json::to_string(&agg.by_process(&placements, NORM_HOURS)).unwrap();
        assert_eq!(first, second);
    }
}

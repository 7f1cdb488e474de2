// ==========================================
// 运营绩效 KPI - 结果组装
// ==========================================
// 流程: 建索引 -> 主周期判空 -> 层级解析 -> 角色过滤 -> 聚合 -> 角色分支
// 红线: 主周期（过滤状态后、角色过滤前）无记录时直接返回最小结果
// 红线: 同一快照 + 同一请求 + 同一 today => 同一结果
// ==========================================

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::config::KpiSettings;
use crate::domain::report::{EmployeeRow, GroupRow, KpiReport, PlanRow, TrendPoint};
use crate::domain::snapshot::{RecordSnapshot, SnapshotIndex};
use crate::domain::types::Role;
use crate::engine::aggregation::MetricAggregator;
use crate::engine::capacity::CapacityCalculator;
use crate::engine::hierarchy::{place_all, Placement};
use crate::engine::period_resolver::ResolvedPeriod;
use crate::engine::scope_filter::RoleScope;
use crate::engine::trend::{month_trend, quarter_trend};

/// 角色专属部分
#[derive(Debug, Default)]
struct RoleSections {
    my_plans: Option<Vec<PlanRow>>,
    month_trend: Option<Vec<TrendPoint>>,
    by_employee: Option<Vec<EmployeeRow>>,
    by_department: Option<Vec<GroupRow>>,
    by_quarter: Option<Vec<TrendPoint>>,
    quarter_trend: Option<Vec<TrendPoint>>,
}

/// 单次计算的输入视图
struct AssemblyInput<'i, 'a> {
    aggregator: MetricAggregator<'i, 'a>,
    headline: Vec<Placement<'a>>,
    context: Vec<Placement<'a>>,
    period: &'i ResolvedPeriod,
    norm_hours: f64,
    today: NaiveDate,
}

// ==========================================
// KpiEngine - 计算入口
// ==========================================
pub struct KpiEngine {
    settings: KpiSettings,
    capacity: CapacityCalculator,
}

impl KpiEngine {
    pub fn new(settings: KpiSettings) -> Self {
        let capacity = CapacityCalculator::new(&settings);
        Self { settings, capacity }
    }

    pub fn settings(&self) -> &KpiSettings {
        &self.settings
    }

    /// 单人定额工时 = 产能 * 定额比例
    pub fn personal_norm_hours(&self, year: i32, months: &[u32], today: NaiveDate) -> f64 {
        self.capacity.capacity_hours(year, months, today) * self.settings.norm_ratio()
    }

    /// 组装完整结果
    ///
    /// # 参数
    /// - `snapshot`: 覆盖 `period.context_months` 的记录快照
    /// - `period`: 已解析的周期
    /// - `role` / `employee_id`: 请求者身份
    /// - `today`: 当前日期（决定当月产能截断）
    #[instrument(level = "debug", skip(self, snapshot, period), fields(year = period.year()))]
    pub fn assemble(
        &self,
        snapshot: &RecordSnapshot,
        period: &ResolvedPeriod,
        role: Role,
        employee_id: &str,
        today: NaiveDate,
    ) -> KpiReport {
        let index = SnapshotIndex::build(snapshot);
        let year = period.year();

        let headline_plans = index.plans_in_months(year, &period.headline_months);
        if headline_plans.is_empty() {
            debug!("主周期无记录，返回最小结果");
            return KpiReport::empty(period.selection, role, self.settings.norm_percent);
        }
        let context_plans = index.plans_in_months(year, &period.context_months);

        let scope = RoleScope::for_caller(role, employee_id, &index);
        let headline = scope.filter(&place_all(&index, &headline_plans), &index);
        let context = scope.filter(&place_all(&index, &context_plans), &index);

        let norm_hours = self.personal_norm_hours(year, &period.headline_months, today);
        debug!(
            headline = headline.len(),
            context = context.len(),
            norm_hours,
            "范围过滤完成"
        );

        let aggregator = MetricAggregator::new(&index, &scope, &self.settings.ungrouped_label);
        let overall = aggregator.overall(&headline, norm_hours);
        let by_process = aggregator.by_process(&headline, norm_hours);

        let input = AssemblyInput {
            aggregator,
            headline,
            context,
            period,
            norm_hours,
            today,
        };
        let sections = self.role_sections(&scope, &input);

        KpiReport {
            period: period.selection,
            role,
            norm: self.settings.norm_percent,
            overall,
            by_process,
            my_plans: sections.my_plans,
            month_trend: sections.month_trend,
            by_employee: sections.by_employee,
            by_department: sections.by_department,
            by_quarter: sections.by_quarter,
            quarter_trend: sections.quarter_trend,
        }
    }

    fn role_sections(&self, scope: &RoleScope, input: &AssemblyInput<'_, '_>) -> RoleSections {
        let year = input.period.year();
        let agg = &input.aggregator;

        match scope {
            RoleScope::IndividualContributor { employee_id } => RoleSections {
                my_plans: Some(agg.my_plans(&input.headline, employee_id)),
                month_trend: Some(month_trend(
                    agg,
                    &input.context,
                    &self.capacity,
                    self.settings.norm_ratio(),
                    year,
                    input.period.trend_quarter,
                    input.today,
                )),
                ..Default::default()
            },
            RoleScope::TeamLead { .. } => RoleSections {
                by_employee: Some(agg.by_employee(&input.headline)),
                quarter_trend: Some(quarter_trend(agg, &input.context, year)),
                ..Default::default()
            },
            RoleScope::Executive => RoleSections {
                by_employee: Some(agg.by_employee(&input.headline)),
                by_department: Some(agg.by_department(&input.headline, input.norm_hours)),
                by_quarter: Some(quarter_trend(agg, &input.headline, year)),
                quarter_trend: Some(quarter_trend(agg, &input.context, year)),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{
        AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, PlanningRecord,
        ProcessRecord, TaskHoursRecord,
    };
    use crate::domain::types::{PeriodSelection, PlanStatus};
    use crate::engine::period_resolver::PeriodResolver;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
    }

    fn plan(id: &str, month: u32, planned: f64, grouping: &str) -> PlanningRecord {
        PlanningRecord {
            id: id.into(),
            year: 2025,
            month,
            planned_hours: Some(planned),
            quarterly_plan_id: Some(grouping.into()),
            measure_id: None,
            status: PlanStatus::Active,
        }
    }

    fn snapshot() -> RecordSnapshot {
        let assign = |p: &str, e: &str| AssignmentRecord {
            plan_id: p.into(),
            employee_id: e.into(),
        };
        let logged = |p: &str, e: &str, h: f64| TaskHoursRecord {
            plan_id: p.into(),
            employee_id: e.into(),
            hours: h,
            task_count: 1,
        };
        RecordSnapshot {
            plans: vec![
                plan("P1", 4, 40.0, "G1"),
                plan("P2", 5, 60.0, "G1"),
                plan("P3", 5, 20.0, "G2"),
            ],
            groupings: vec![
                GroupingRecord {
                    id: "G1".into(),
                    department_id: Some("D1".into()),
                    process_id: Some("PR1".into()),
                    quarter: 2,
                },
                GroupingRecord {
                    id: "G2".into(),
                    department_id: Some("D2".into()),
                    process_id: Some("PR2".into()),
                    quarter: 2,
                },
            ],
            task_hours: vec![
                logged("P1", "E1", 30.0),
                logged("P2", "E1", 45.0),
                logged("P3", "E2", 10.0),
            ],
            assignments: vec![assign("P1", "E1"), assign("P2", "E1"), assign("P3", "E2")],
            measures: vec![],
            processes: vec![
                ProcessRecord { id: "PR1".into(), name: "Intake".into(), department_id: Some("D1".into()) },
                ProcessRecord { id: "PR2".into(), name: "Review".into(), department_id: Some("D2".into()) },
            ],
            departments: vec![
                DepartmentRecord { id: "D1".into(), name: "Ops".into() },
                DepartmentRecord { id: "D2".into(), name: "Audit".into() },
            ],
            employees: vec![
                EmployeeRecord { id: "E1".into(), name: "Ann".into(), department_id: Some("D1".into()) },
                EmployeeRecord { id: "E2".into(), name: "Bo".into(), department_id: Some("D2".into()) },
            ],
        }
    }

    fn run(selection: PeriodSelection, role: Role, employee: &str) -> KpiReport {
        let engine = KpiEngine::new(KpiSettings::default());
        let period = PeriodResolver::resolve(selection, role, today());
        engine.assemble(&snapshot(), &period, role, employee, today())
    }

    #[test]
    fn test_empty_headline_returns_minimal_result() {
        let report = run(PeriodSelection::month(2025, 9), Role::Chief, "E1");
        assert_eq!(report.overall.planned, 0.0);
        assert!(report.by_process.is_empty());
        assert!(report.by_employee.is_none());
        assert!(report.quarter_trend.is_none());
        assert_eq!(report.norm, 70.0);
    }

    #[test]
    fn test_individual_sections() {
        let report = run(PeriodSelection::month(2025, 5), Role::Employee, "E1");
        assert_eq!(report.overall.actual, 45.0);
        assert_eq!(report.my_plans.as_ref().map(|p| p.len()), Some(1));
        let trend = report.month_trend.expect("month trend");
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].period, "2025-04");
        assert_eq!(trend[0].actual, 30.0);
        assert!(report.by_employee.is_none());
    }

    #[test]
    fn test_team_lead_sees_own_department_only() {
        let report = run(PeriodSelection::month(2025, 5), Role::Head, "E1");
        assert_eq!(report.overall.planned, 60.0);
        assert_eq!(report.overall.actual, 45.0);
        assert_eq!(report.overall.kpi, 75.0);
        assert_eq!(report.by_process.len(), 1);
        assert_eq!(report.quarter_trend.as_ref().map(|t| t.len()), Some(4));
        assert!(report.by_department.is_none());
    }

    #[test]
    fn test_executive_sections() {
        let report = run(PeriodSelection::quarter(2025, 2), Role::Chief, "E9");
        assert_eq!(report.overall.planned, 120.0);
        assert_eq!(report.overall.actual, 85.0);
        assert_eq!(report.by_department.as_ref().map(|d| d.len()), Some(2));
        let by_quarter = report.by_quarter.expect("by quarter");
        assert_eq!(by_quarter[1].planned, 120.0);
        assert_eq!(by_quarter[0].planned, 0.0);
        assert_eq!(report.by_employee.map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let a = run(PeriodSelection::year(2025), Role::Chief, "E1");
        let b = run(PeriodSelection::year(2025), Role::Chief, "E1");
        assert_eq!(a, b);
    }
}

// ==========================================
// 运营绩效 KPI - 计算服务
// ==========================================
// 职责: 校验 -> 周期解析 -> 并发取数 -> 组装
// 约束: 8 个读取并发发起，任一失败即整体失败（不返回部分结果）
// ==========================================

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::api::dto::{Caller, KpiRequest, KpiResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_employee_id, validate_request};
use crate::config::KpiSettings;
use crate::domain::snapshot::RecordSnapshot;
use crate::engine::assembler::KpiEngine;
use crate::engine::period_resolver::PeriodResolver;
use crate::repository::kpi_source::{KpiDataSource, SnapshotQuery};
use crate::repository::RepositoryResult;

// ==========================================
// KpiService - 计算服务
// ==========================================
pub struct KpiService {
    source: Arc<dyn KpiDataSource>,
    engine: KpiEngine,
}

impl KpiService {
    /// 创建新的 KpiService 实例
    ///
    /// # 参数
    /// - source: 数据源（SQLite / 内存）
    /// - settings: 计算参数
    pub fn new(source: Arc<dyn KpiDataSource>, settings: KpiSettings) -> Self {
        Self {
            source,
            engine: KpiEngine::new(settings),
        }
    }

    pub fn settings(&self) -> &KpiSettings {
        self.engine.settings()
    }

    /// 按本地当前日期计算
    pub async fn compute(&self, request: &KpiRequest, caller: &Caller) -> ApiResult<KpiResponse> {
        self.compute_at(request, caller, Local::now().date_naive()).await
    }

    /// 按指定日期计算
    pub async fn compute_at(
        &self,
        request: &KpiRequest,
        caller: &Caller,
        today: NaiveDate,
    ) -> ApiResult<KpiResponse> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "kpi_compute",
            request_id = %request_id,
            employee_id = %caller.employee_id,
            role = %caller.role
        );

        async move {
            validate_employee_id(&caller.employee_id)?;
            let selection = validate_request(request)?;
            let period = PeriodResolver::resolve(selection, caller.role, today);

            let query = SnapshotQuery::new(period.year(), period.context_months.clone());
            let snapshot = self.load_snapshot(&query).await?;
            info!(
                year = query.year,
                months = ?query.months,
                plans = snapshot.plans.len(),
                "快照读取完成"
            );

            let report = self
                .engine
                .assemble(&snapshot, &period, caller.role, &caller.employee_id, today);
            info!(
                planned = report.overall.planned,
                actual = report.overall.actual,
                kpi = report.overall.kpi,
                "KPI 计算完成"
            );
            Ok::<_, ApiError>(report)
        }
        .instrument(span)
        .await
    }

    /// 并发读取 8 类记录
    async fn load_snapshot(&self, query: &SnapshotQuery) -> RepositoryResult<RecordSnapshot> {
        let source = self.source.as_ref();
        let (plans, groupings, task_hours, assignments, measures, processes, departments, employees) =
            futures::try_join!(
                source.fetch_plans(query),
                source.fetch_groupings(query),
                source.fetch_task_hours(query),
                source.fetch_assignments(query),
                source.fetch_measures(query),
                source.fetch_processes(query),
                source.fetch_departments(query),
                source.fetch_employees(query),
            )?;

        Ok(RecordSnapshot {
            plans,
            groupings,
            task_hours,
            assignments,
            measures,
            processes,
            departments,
            employees,
        })
    }
}

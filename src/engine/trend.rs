// ==========================================
// 运营绩效 KPI - 趋势序列
// ==========================================
// 月度趋势（个人）: 所在季度的 3 个月，计划 = 单月产能 * 定额比例
// 季度趋势（部门/全局）: 4 个季度，计划/实际取自记录累加
// 红线: 序列长度固定，无数据的点输出 0
// ==========================================

use chrono::NaiveDate;

use crate::domain::report::TrendPoint;
use crate::domain::types::{months_of_quarter, quarter_of_month};
use crate::engine::aggregation::{MetricAggregator, Totals};
use crate::engine::capacity::CapacityCalculator;
use crate::engine::hierarchy::Placement;

fn point(period: String, totals: Totals) -> TrendPoint {
    let triple = totals.to_triple();
    TrendPoint {
        period,
        planned: triple.planned,
        actual: triple.actual,
        kpi: triple.kpi,
    }
}

/// 个人月度趋势（固定 3 个点）
///
/// # 参数
/// - `placements`: 本人可见的上下文记录
/// - `norm_ratio`: 定额比例（0.7 = 70%）
#[allow(clippy::too_many_arguments)]
pub fn month_trend(
    aggregator: &MetricAggregator<'_, '_>,
    placements: &[Placement<'_>],
    capacity: &CapacityCalculator,
    norm_ratio: f64,
    year: i32,
    quarter: u32,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    months_of_quarter(quarter)
        .into_iter()
        .map(|month| {
            let in_month: Vec<Placement<'_>> = placements
                .iter()
                .filter(|p| p.plan.year == year && p.plan.month == month)
                .copied()
                .collect();
            let totals = Totals {
                planned: capacity.capacity_hours(year, &[month], today) * norm_ratio,
                actual: aggregator.totals(&in_month).actual,
            };
            point(format!("{}-{:02}", year, month), totals)
        })
        .collect()
}

/// 季度趋势（固定 4 个点）
pub fn quarter_trend(
    aggregator: &MetricAggregator<'_, '_>,
    placements: &[Placement<'_>],
    year: i32,
) -> Vec<TrendPoint> {
    (1..=4u32)
        .map(|quarter| {
            let in_quarter: Vec<Placement<'_>> = placements
                .iter()
                .filter(|p| p.plan.year == year && quarter_of_month(p.plan.month) == quarter)
                .copied()
                .collect();
            point(format!("{}-Q{}", year, quarter), aggregator.totals(&in_quarter))
        })
        .collect()
}

// ==========================================
// 运营绩效 KPI - 引擎层
// ==========================================
// 职责: 周期解析 / 产能 / 层级解析 / 角色过滤 / 聚合 / 趋势 / 组装
// 红线: Engine 不拼 SQL, 不读时钟（today 由调用方传入）
// ==========================================

pub mod aggregation;
pub mod assembler;
pub mod capacity;
pub mod hierarchy;
pub mod metric_math;
pub mod period_resolver;
pub mod scope_filter;
pub mod trend;

// 重导出核心引擎
pub use aggregation::{MetricAggregator, Totals};
pub use assembler::KpiEngine;
pub use capacity::{CapacityBreakdown, CapacityCalculator};
pub use hierarchy::{place_all, Placement, UNGROUPED_ID};
pub use period_resolver::{PeriodResolver, ResolvedPeriod};
pub use scope_filter::RoleScope;

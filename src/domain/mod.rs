// ==========================================
// 运营绩效 KPI - 领域模型层
// ==========================================
// 职责: 输入记录、快照索引、枚举类型、输出结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod records;
pub mod report;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use records::{
    AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, MeasureRecord,
    PlanningRecord, ProcessRecord, TaskHoursRecord,
};
pub use report::{EmployeeRow, GroupRow, KpiReport, MetricTriple, PlanRow, TrendPoint};
pub use snapshot::{LoggedHours, RecordSnapshot, SnapshotIndex};
pub use types::{PeriodSelection, PeriodType, PlanStatus, Role};

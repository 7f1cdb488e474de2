// ==========================================
// 运营绩效 KPI - 计算参数
// ==========================================
// 职责: 定额比例 / 日工时 / 年假天数 / 未分组标签
// 来源: 默认值，可被 config_kv 覆写（见 ConfigManager）
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认定额比例（%）
pub const DEFAULT_NORM_PERCENT: f64 = 70.0;
/// 标准日工时
pub const DEFAULT_WORKDAY_HOURS: f64 = 8.0;
/// 年假（日历日 / 年）
pub const DEFAULT_ANNUAL_LEAVE_DAYS: f64 = 24.0;
/// 未分组桶显示名
pub const DEFAULT_UNGROUPED_LABEL: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSettings {
    pub norm_percent: f64,
    pub workday_hours: f64,
    pub annual_leave_days: f64,
    pub ungrouped_label: String,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            norm_percent: DEFAULT_NORM_PERCENT,
            workday_hours: DEFAULT_WORKDAY_HOURS,
            annual_leave_days: DEFAULT_ANNUAL_LEAVE_DAYS,
            ungrouped_label: DEFAULT_UNGROUPED_LABEL.to_string(),
        }
    }
}

impl KpiSettings {
    /// 定额比例（小数形式）
    pub fn norm_ratio(&self) -> f64 {
        self.norm_percent / 100.0
    }
}

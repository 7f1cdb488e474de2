// ==========================================
// 运营绩效 KPI - 配置层
// ==========================================
// 职责: KPI 计算参数，支持 config_kv 覆写
// ==========================================

pub mod config_manager;
pub mod kpi_settings;

pub use config_manager::{config_keys, ConfigManager};
pub use kpi_settings::KpiSettings;

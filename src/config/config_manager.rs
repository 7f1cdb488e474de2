// ==========================================
// 运营绩效 KPI - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取 KPI 参数覆写
// 存储: config_kv 表 (scope_id + key + value)
// 说明: 缺失或无法解析的值回退到默认值
// ==========================================

use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::config::kpi_settings::KpiSettings;
use crate::db::open_sqlite_connection;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取正数配置，缺失 / 非法时回退默认值
    fn get_positive_f64(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => {
                warn!(key, value = %raw, "配置值非法，使用默认值 {}", default);
                Ok(default)
            }
        }
    }

    /// 加载 KPI 计算参数
    pub fn load_kpi_settings(&self) -> Result<KpiSettings, Box<dyn Error>> {
        let defaults = KpiSettings::default();

        let ungrouped_label = self
            .get_config_value(config_keys::UNGROUPED_LABEL)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.ungrouped_label);

        Ok(KpiSettings {
            norm_percent: self.get_positive_f64(config_keys::NORM_PERCENT, defaults.norm_percent)?,
            workday_hours: self
                .get_positive_f64(config_keys::WORKDAY_HOURS, defaults.workday_hours)?,
            annual_leave_days: self
                .get_positive_f64(config_keys::ANNUAL_LEAVE_DAYS, defaults.annual_leave_days)?,
            ungrouped_label,
        })
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const NORM_PERCENT: &str = "kpi_norm_percent";
    pub const WORKDAY_HOURS: &str = "kpi_workday_hours";
    pub const ANNUAL_LEAVE_DAYS: &str = "kpi_annual_leave_days";
    pub const UNGROUPED_LABEL: &str = "kpi_ungrouped_label";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_table_empty() {
        let settings = manager().load_kpi_settings().unwrap();
        assert_eq!(settings, KpiSettings::default());
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let manager = manager();
        manager.set_global_config_value(config_keys::NORM_PERCENT, "80").unwrap();
        manager.set_global_config_value(config_keys::WORKDAY_HOURS, "abc").unwrap();
        manager.set_global_config_value(config_keys::UNGROUPED_LABEL, "未分组").unwrap();

        let settings = manager.load_kpi_settings().unwrap();
        assert_eq!(settings.norm_percent, 80.0);
        assert_eq!(settings.workday_hours, 8.0);
        assert_eq!(settings.ungrouped_label, "未分组");
    }
}

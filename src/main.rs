// ==========================================
// 运营绩效 KPI - 命令行入口
// ==========================================
// 用法: ops-kpi [db_path] [employee_id] [role] [year] [period_type] [period_value]
// 输出: stdout 打印 JSON 结果，日志写 stderr
// ==========================================

use anyhow::{anyhow, Context};
use chrono::{Datelike, Local};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use ops_kpi::api::{Caller, KpiRequest, KpiService};
use ops_kpi::config::ConfigManager;
use ops_kpi::db::{get_default_db_path, init_schema, open_sqlite_connection};
use ops_kpi::domain::Role;
use ops_kpi::repository::SqliteKpiSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ops_kpi::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(|s| s.trim()).filter(|s| !s.is_empty());

    let db_path = arg(0).map(str::to_string).unwrap_or_else(get_default_db_path);
    let employee_id = arg(1).unwrap_or("E001").to_string();
    let role = match arg(2) {
        Some(raw) => Role::from_str(raw).map_err(|e| anyhow!(e))?,
        None => Role::Employee,
    };
    let year = match arg(3) {
        Some(raw) => raw.parse::<i32>().with_context(|| format!("year 无法解析: {}", raw))?,
        None => Local::now().year(),
    };
    let period_value = match arg(5) {
        Some(raw) => Some(
            raw.parse::<u32>()
                .with_context(|| format!("period_value 无法解析: {}", raw))?,
        ),
        None => None,
    };

    tracing::info!("{} v{}", ops_kpi::APP_NAME, ops_kpi::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path).context("无法打开数据库")?;
    init_schema(&conn).context("建表失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let settings = ConfigManager::from_connection(conn.clone())
        .load_kpi_settings()
        .map_err(|e| anyhow!("加载 KPI 配置失败: {}", e))?;

    let service = KpiService::new(Arc::new(SqliteKpiSource::from_connection(conn)), settings);
    let request = KpiRequest::new(year, arg(4), period_value);
    let caller = Caller::new(employee_id, role);

    let report = service.compute(&request, &caller).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

// ==========================================
// 运营绩效 KPI - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 提供记录表 + config_kv 的建表脚本
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "OPS_KPI_DB_PATH";

const DB_FILE_NAME: &str = "ops_kpi.db";

/// 默认数据库路径
///
/// 优先 `OPS_KPI_DB_PATH`，其次用户数据目录下的 `ops-kpi/ops_kpi.db`，最后为当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let path = match dirs::data_dir() {
        Some(data_dir) => {
            let dir = data_dir.join("ops-kpi");
            // 建目录失败时由 open 报错
            std::fs::create_dir_all(&dir).ok();
            dir.join(DB_FILE_NAME)
        }
        None => PathBuf::from(".").join(DB_FILE_NAME),
    };

    path.to_string_lossy().to_string()
}

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 外键只作为关联约定，不在库内强制（快照允许悬空引用，解析阶段回退到未分组）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS department (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS process (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            department_id TEXT
        );

        CREATE TABLE IF NOT EXISTS measure (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            process_id TEXT
        );

        CREATE TABLE IF NOT EXISTS employee (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            department_id TEXT
        );

        CREATE TABLE IF NOT EXISTS quarterly_plan (
            id TEXT PRIMARY KEY,
            department_id TEXT,
            process_id TEXT,
            quarter INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS monthly_plan (
            id TEXT PRIMARY KEY,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            planned_hours REAL,
            quarterly_plan_id TEXT,
            measure_id TEXT,
            status TEXT NOT NULL DEFAULT 'active'
        );
        CREATE INDEX IF NOT EXISTS idx_monthly_plan_period ON monthly_plan (year, month);

        CREATE TABLE IF NOT EXISTS plan_assignee (
            plan_id TEXT NOT NULL,
            employee_id TEXT NOT NULL,
            PRIMARY KEY (plan_id, employee_id)
        );

        CREATE TABLE IF NOT EXISTS task_hours (
            plan_id TEXT NOT NULL,
            employee_id TEXT NOT NULL,
            hours REAL NOT NULL DEFAULT 0,
            task_count INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_task_hours_plan ON task_hours (plan_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

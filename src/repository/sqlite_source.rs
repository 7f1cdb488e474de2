// ==========================================
// 运营绩效 KPI - SQLite 数据源
// ==========================================
// 红线: Repository 不含业务逻辑（只做范围过滤与行映射）
// 约束: 所有查询使用参数化
// ==========================================

use async_trait::async_trait;
use rusqlite::{params_from_iter, types::Value, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::db::open_sqlite_connection;
use crate::domain::records::{
    AssignmentRecord, DepartmentRecord, EmployeeRecord, GroupingRecord, MeasureRecord,
    PlanningRecord, ProcessRecord, TaskHoursRecord,
};
use crate::domain::types::PlanStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kpi_source::{KpiDataSource, SnapshotQuery};

// 范围内计划的子查询条件（?1 = year，?2.. = months）
const PLAN_SCOPE: &str = "mp.year = ?1 AND mp.status IN ('active', 'completed')";

// ==========================================
// SqliteKpiSource - SQLite 数据源
// ==========================================
pub struct SqliteKpiSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKpiSource {
    /// 打开数据库文件
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建数据源
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 生成 `?2, ?3, ...` 形式的月份占位符与参数（?1 为年份）
    fn scope_params(query: &SnapshotQuery) -> (String, Vec<Value>) {
        let placeholders = (0..query.months.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let mut values = vec![Value::Integer(query.year as i64)];
        values.extend(query.months.iter().map(|m| Value::Integer(*m as i64)));
        (placeholders, values)
    }

    /// 执行范围查询
    fn query_scoped<T, F>(&self, sql_template: &str, query: &SnapshotQuery, map: F) -> RepositoryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        if query.months.is_empty() {
            return Ok(Vec::new());
        }
        let (placeholders, values) = Self::scope_params(query);
        let sql = sql_template
            .replace("{scope}", PLAN_SCOPE)
            .replace("{months}", &placeholders);

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 执行全表查询
    fn query_all<T, F>(&self, sql: &str, map: F) -> RepositoryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_status(raw: &str) -> PlanStatus {
    PlanStatus::from_str(raw).unwrap_or_else(|e| {
        warn!("{}，按 draft 处理", e);
        PlanStatus::Draft
    })
}

#[async_trait]
impl KpiDataSource for SqliteKpiSource {
    async fn fetch_plans(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<PlanningRecord>> {
        let plans = self.query_scoped(
            r#"
            SELECT mp.id, mp.year, mp.month, mp.planned_hours,
                   mp.quarterly_plan_id, mp.measure_id, mp.status
            FROM monthly_plan mp
            WHERE {scope} AND mp.month IN ({months})
            ORDER BY mp.rowid
            "#,
            query,
            |row| {
                Ok(PlanningRecord {
                    id: row.get(0)?,
                    year: row.get(1)?,
                    month: row.get(2)?,
                    planned_hours: row.get(3)?,
                    quarterly_plan_id: row.get(4)?,
                    measure_id: row.get(5)?,
                    status: parse_status(&row.get::<_, String>(6)?),
                })
            },
        )?;
        debug!(year = query.year, count = plans.len(), "monthly_plan 读取完成");
        Ok(plans)
    }

    async fn fetch_groupings(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<GroupingRecord>> {
        self.query_all(
            "SELECT id, department_id, process_id, quarter FROM quarterly_plan ORDER BY rowid",
            |row| {
                Ok(GroupingRecord {
                    id: row.get(0)?,
                    department_id: row.get(1)?,
                    process_id: row.get(2)?,
                    quarter: row.get(3)?,
                })
            },
        )
    }

    async fn fetch_task_hours(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<TaskHoursRecord>> {
        self.query_scoped(
            r#"
            SELECT th.plan_id, th.employee_id, th.hours, th.task_count
            FROM task_hours th
            JOIN monthly_plan mp ON mp.id = th.plan_id
            WHERE {scope} AND mp.month IN ({months})
            ORDER BY th.rowid
            "#,
            query,
            |row| {
                Ok(TaskHoursRecord {
                    plan_id: row.get(0)?,
                    employee_id: row.get(1)?,
                    hours: row.get(2)?,
                    task_count: row.get(3)?,
                })
            },
        )
    }

    async fn fetch_assignments(&self, query: &SnapshotQuery) -> RepositoryResult<Vec<AssignmentRecord>> {
        self.query_scoped(
            r#"
            SELECT pa.plan_id, pa.employee_id
            FROM plan_assignee pa
            JOIN monthly_plan mp ON mp.id = pa.plan_id
            WHERE {scope} AND mp.month IN ({months})
            ORDER BY pa.rowid
            "#,
            query,
            |row| {
                Ok(AssignmentRecord {
                    plan_id: row.get(0)?,
                    employee_id: row.get(1)?,
                })
            },
        )
    }

    async fn fetch_measures(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<MeasureRecord>> {
        self.query_all("SELECT id, name, process_id FROM measure ORDER BY rowid", |row| {
            Ok(MeasureRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                process_id: row.get(2)?,
            })
        })
    }

    async fn fetch_processes(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<ProcessRecord>> {
        self.query_all("SELECT id, name, department_id FROM process ORDER BY rowid", |row| {
            Ok(ProcessRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                department_id: row.get(2)?,
            })
        })
    }

    async fn fetch_departments(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<DepartmentRecord>> {
        self.query_all("SELECT id, name FROM department ORDER BY rowid", |row| {
            Ok(DepartmentRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    async fn fetch_employees(&self, _query: &SnapshotQuery) -> RepositoryResult<Vec<EmployeeRecord>> {
        self.query_all("SELECT id, name, department_id FROM employee ORDER BY rowid", |row| {
            Ok(EmployeeRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                department_id: row.get(2)?,
            })
        })
    }
}

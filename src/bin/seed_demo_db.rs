// ==========================================
// 运营绩效 KPI - 演示数据库初始化
// ==========================================
// 用法: seed_demo_db [db_path] [year]
// 已存在的库先备份再重建
// ==========================================

use chrono::{Datelike, Local};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use ops_kpi::config::{config_keys, ConfigManager};
use ops_kpi::db::{get_default_db_path, init_schema, open_sqlite_connection};
use std::sync::{Arc, Mutex};

const DEPARTMENTS: &[(&str, &str)] = &[("D1", "Operations"), ("D2", "Quality")];

const PROCESSES: &[(&str, &str, &str)] = &[
    ("PR1", "Order intake", "D1"),
    ("PR2", "Fulfilment", "D1"),
    ("PR3", "Audit", "D2"),
];

const MEASURES: &[(&str, &str, &str)] = &[
    ("M1", "Shorten intake queue", "PR1"),
    ("M2", "Automate picking list", "PR2"),
    ("M3", "Quarterly audit round", "PR3"),
];

const EMPLOYEES: &[(&str, &str, &str)] = &[
    ("E001", "Alex", "D1"),
    ("E002", "Sam", "D1"),
    ("E003", "Kim", "D2"),
    ("H001", "Jordan", "D1"),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    let year = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or_else(|| Local::now().year());

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed_demo(&conn, year)?;

    let conn = Arc::new(Mutex::new(conn));
    ConfigManager::from_connection(conn.clone())
        .set_global_config_value(config_keys::NORM_PERCENT, "70")?;

    print_quick_counts(&conn)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo(conn: &Connection, year: i32) -> Result<(), Box<dyn Error>> {
    for (id, name) in DEPARTMENTS {
        conn.execute("INSERT INTO department (id, name) VALUES (?1, ?2)", params![id, name])?;
    }
    for (id, name, dept) in PROCESSES {
        conn.execute(
            "INSERT INTO process (id, name, department_id) VALUES (?1, ?2, ?3)",
            params![id, name, dept],
        )?;
    }
    for (id, name, process) in MEASURES {
        conn.execute(
            "INSERT INTO measure (id, name, process_id) VALUES (?1, ?2, ?3)",
            params![id, name, process],
        )?;
    }
    for (id, name, dept) in EMPLOYEES {
        conn.execute(
            "INSERT INTO employee (id, name, department_id) VALUES (?1, ?2, ?3)",
            params![id, name, dept],
        )?;
    }

    // 每个流程每季度一条季度计划，每月一条月度计划
    let mut plan_seq = 0;
    for quarter in 1..=4u32 {
        for (idx, (process_id, _, dept)) in PROCESSES.iter().enumerate() {
            let grouping_id = format!("Q{}-{}", quarter, process_id);
            conn.execute(
                "INSERT INTO quarterly_plan (id, department_id, process_id, quarter) VALUES (?1, ?2, ?3, ?4)",
                params![grouping_id, dept, process_id, quarter],
            )?;

            for month in (quarter - 1) * 3 + 1..=quarter * 3 {
                plan_seq += 1;
                let plan_id = format!("MP{:03}", plan_seq);
                let planned = 40.0 + 10.0 * idx as f64;
                let status = if month % 5 == 0 { "draft" } else { "active" };
                conn.execute(
                    "INSERT INTO monthly_plan (id, year, month, planned_hours, quarterly_plan_id, measure_id, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![plan_id, year, month, planned, grouping_id, MEASURES[idx].0, status],
                )?;

                let assignees: &[&str] = match *dept {
                    "D1" => &["E001", "E002"],
                    _ => &["E003"],
                };
                for (n, emp) in assignees.iter().enumerate() {
                    conn.execute(
                        "INSERT INTO plan_assignee (plan_id, employee_id) VALUES (?1, ?2)",
                        params![plan_id, emp],
                    )?;
                    let hours = planned / assignees.len() as f64 * (0.6 + 0.1 * (month % 4) as f64)
                        + n as f64 * 2.5;
                    conn.execute(
                        "INSERT INTO task_hours (plan_id, employee_id, hours, task_count) VALUES (?1, ?2, ?3, ?4)",
                        params![plan_id, emp, hours, 1 + (month % 3)],
                    )?;
                }
            }
        }
    }

    Ok(())
}

fn print_quick_counts(conn: &Arc<Mutex<Connection>>) -> Result<(), Box<dyn Error>> {
    let conn = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
    for table in ["department", "employee", "quarterly_plan", "monthly_plan", "task_hours"] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("{:<16} {}", table, count);
    }
    Ok(())
}

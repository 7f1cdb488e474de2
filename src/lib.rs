// ==========================================
// 运营绩效 KPI - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 计划工时 vs 实际工时的多角色 KPI 计算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 计算规则
pub mod engine;

// 配置层 - 计算参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 计算入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::types::{PeriodSelection, PeriodType, PlanStatus, Role};

pub use domain::{KpiReport, RecordSnapshot};

pub use engine::{CapacityCalculator, KpiEngine, PeriodResolver};

pub use api::{ApiError, Caller, KpiRequest, KpiService};

pub use repository::{InMemoryKpiSource, KpiDataSource, SqliteKpiSource};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "运营绩效 KPI";

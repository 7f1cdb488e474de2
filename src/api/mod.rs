// ==========================================
// 运营绩效 KPI - API 层
// ==========================================
// 职责: 请求校验、DTO、计算服务入口
// ==========================================

pub mod dto;
pub mod error;
pub mod kpi_service;
pub mod validator;

// 重导出核心类型
pub use dto::{Caller, KpiRequest, KpiResponse};
pub use error::{ApiError, ApiResult};
pub use kpi_service::KpiService;
pub use validator::{validate_employee_id, validate_request};

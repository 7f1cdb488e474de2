// ==========================================
// 运营绩效 KPI - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将Repository错误收敛为单一内部错误
// 约束: 数据源失败不返回部分结果，也不重试
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;
use tracing::error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

// ==========================================
// 从 RepositoryError 转换
// 原始原因只写日志，对外统一为内部错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        error!(error = %err, "数据源读取失败");
        ApiError::Internal("KPI 数据读取失败".to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

//! 预订服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

/// 预订服务错误类型
#[derive(Debug, Error)]
pub enum BookingError {
    // === 输入错误 ===
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),

    #[error("无效的标识符: {0}")]
    InvalidIdentifier(String),

    // === 资源错误 ===
    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    // === 系统错误 ===
    #[error("存储层不可用: {0}")]
    StorageUnavailable(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 预订服务 Result 类型别名
pub type Result<T> = std::result::Result<T, BookingError>;

impl BookingError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_) | Self::Internal(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON 处理错误: {}", err))
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidRequest(errors.to_string())
    }
}

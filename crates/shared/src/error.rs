//! 基础设施错误处理模块
//!
//! 定义配置加载与数据库连接阶段的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("数据库属性缺失: {key}（文件 {file}）")]
    MissingProperty { key: String, file: String },

    // ==================== 数据库错误 ====================
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, SharedError>;

impl SharedError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::MissingProperty { .. } => "MISSING_PROPERTY",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// 是否为可重试错误
    ///
    /// 配置错误重试也不会成功，只有连接类错误值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

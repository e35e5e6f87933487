//! 课程预订 HTTP 服务
//!
//! 提供课程列表、搜索、编辑和下单的 REST API。
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型及 HTTP 映射
//! - `extract`: 自定义提取器
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由与中间件装配
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, SearchParams, UpdateAppliedDto};
pub use error::{ApiError, Result};
pub use state::AppState;

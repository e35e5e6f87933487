//! DTO 模块
//!
//! 请求参数与统一响应结构；课程、订单实体直接复用领域模型的序列化

pub mod request;
pub mod response;

pub use request::SearchParams;
pub use response::{ApiResponse, UpdateAppliedDto};

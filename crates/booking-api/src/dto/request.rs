//! 请求 DTO 定义

use serde::Deserialize;

/// 搜索参数
///
/// 缺少 `q` 时等同空字符串，返回全部课程
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

//! 共享库
//!
//! 包含各服务共用的配置加载、数据库连接属性、连接池生命周期与可观测性基础设施代码。

pub mod config;
pub mod database;
pub mod db_properties;
pub mod error;
pub mod observability;

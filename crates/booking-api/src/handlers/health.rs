//! 健康检查处理器

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

const SERVICE_NAME: &str = "booking-api";

/// 存活探针：服务进程正常即返回 ok
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针：检查数据库连接是否可用
///
/// 未配置数据库（内存存储）时视为就绪
pub async fn readiness_check(State(state): State<AppState>) -> Json<Value> {
    let db_ok = match &state.database {
        Some(db) => db.health_check().await.is_ok(),
        None => true,
    };

    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "checks": {
            "database": if db_ok { "ok" } else { "fail" }
        }
    }))
}

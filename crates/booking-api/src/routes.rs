//! 路由配置模块
//!
//! 定义 REST API 端点并装配中间件、CORS 与静态资源

use axum::{
    Router,
    http::{HeaderValue, Uri},
    middleware,
    routing::{get, post},
};
use booking_shared::config::HttpConfig;
use booking_shared::observability::middleware as obs_middleware;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::{error::ApiError, handlers, state::AppState};

/// 业务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(handlers::lesson::list_lessons))
        .route(
            "/lessons/{id}",
            get(handlers::lesson::get_lesson).put(handlers::lesson::update_lesson),
        )
        .route("/search", get(handlers::lesson::search_lessons))
        .route("/orders", post(handlers::order::place_order))
        .route("/orders/{id}", get(handlers::order::get_order))
}

/// 构建完整应用
///
/// 包含业务路由、探针、`/images` 静态资源、未知路由兜底和可观测性中间件
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .merge(api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest_service("/images", ServeDir::new(&http.static_dir))
        .fallback(route_not_found)
        .layer(cors_layer(&http.cors_origins))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// CORS 配置：`*` 放行所有来源，否则按逗号分隔的来源列表放行
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

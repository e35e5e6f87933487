//! 课程 API 处理器
//!
//! 课程列表、搜索、详情与局部更新

use axum::{
    Json,
    extract::{Path, Query, State},
};
use booking_service::{Lesson, LessonPatch};
use tracing::info;

use crate::{
    dto::{ApiResponse, SearchParams, UpdateAppliedDto},
    error::ApiError,
    extract::ValidatedJson,
    state::AppState,
};

/// 课程列表
///
/// GET /lessons
pub async fn list_lessons(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, ApiError> {
    let lessons = state.catalog.list_all().await?;
    Ok(Json(ApiResponse::success(lessons)))
}

/// 搜索课程
///
/// GET /search?q=
pub async fn search_lessons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, ApiError> {
    let lessons = state.catalog.search(&params.q).await?;
    Ok(Json(ApiResponse::success(lessons)))
}

/// 课程详情
///
/// GET /lessons/{id}
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Lesson>>, ApiError> {
    let lesson = state.catalog.get(&id).await?;
    Ok(Json(ApiResponse::success(lesson)))
}

/// 局部更新课程
///
/// PUT /lessons/{id}
///
/// ID 合法但无匹配课程时返回 404
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<LessonPatch>,
) -> Result<Json<ApiResponse<UpdateAppliedDto>>, ApiError> {
    let applied = state.catalog.update_entry(&id, patch).await?;
    if !applied {
        return Err(ApiError::not_found("Lesson", id));
    }

    info!(lesson_id = %id, "Lesson updated");
    Ok(Json(ApiResponse::success(UpdateAppliedDto { applied })))
}

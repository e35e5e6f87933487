//! 订单 API 处理器

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use booking_service::{OrderRequest, OrderResult, PersistedOrder};
use tracing::info;

use crate::{dto::ApiResponse, error::ApiError, extract::ValidatedJson, state::AppState};

/// 下单
///
/// POST /orders
///
/// 订单写入成功即返回 201，单条明细的扣减结果见 `itemOutcomes`
pub async fn place_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<OrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResult>>), ApiError> {
    let result = state.orders.place_order(req).await?;

    info!(
        order_id = %result.order_id,
        inventory_status = %result.inventory_status,
        "Order placed"
    );

    let message = if result.fully_applied() {
        "下单成功"
    } else {
        "下单成功，部分课程未扣减名额"
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(result, message)),
    ))
}

/// 订单详情
///
/// GET /orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PersistedOrder>>, ApiError> {
    let order = state.orders.get_order(&id).await?;
    Ok(Json(ApiResponse::success(order)))
}

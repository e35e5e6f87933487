//! HTTP 层错误类型定义
//!
//! 将领域错误映射为状态码和统一响应体

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking_service::BookingError;
use serde_json::json;

/// HTTP 层错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 输入错误
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),
    #[error("无效的标识符: {0}")]
    InvalidIdentifier(String),

    // 资源不存在
    #[error("{entity}不存在: {id}")]
    NotFound { entity: String, id: String },
    #[error("接口不存在: {0}")]
    RouteNotFound(String),

    // 系统错误
    #[error("存储层不可用: {0}")]
    StorageUnavailable(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::StorageUnavailable(e) => {
                tracing::error!(error = %e, "存储层操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidRequest(errors.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            BookingError::InvalidIdentifier(id) => Self::InvalidIdentifier(id),
            BookingError::NotFound { entity, id } => Self::NotFound { entity, id },
            BookingError::StorageUnavailable(msg) => Self::StorageUnavailable(msg),
            BookingError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// HTTP 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ---- 辅助函数 ----

    fn all_error_variants() -> Vec<(ApiError, StatusCode, &'static str)> {
        vec![
            (ApiError::InvalidRequest("name".into()), StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            (ApiError::InvalidIdentifier("abc".into()), StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER"),
            (ApiError::not_found("Lesson", "1"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ApiError::RouteNotFound("/nope".into()), StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
            (ApiError::StorageUnavailable("pool timed out".into()), StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_UNAVAILABLE"),
            (ApiError::Internal("unexpected".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_code_and_error_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false));
            assert_eq!(body["code"], json!(expected_code));
            assert!(!body["message"].as_str().unwrap_or("").is_empty());
            assert!(body["data"].is_null());
        }
    }

    /// 系统级错误不能把存储层细节返回给调用方
    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let system_errors = vec![
            (
                ApiError::StorageUnavailable("postgres://10.0.0.5:5432 connection refused".into()),
                "10.0.0.5",
            ),
            (ApiError::Internal("JSON 处理错误: trailing comma".into()), "trailing comma"),
        ];

        for (error, leaked_detail) in system_errors {
            let response = error.into_response();
            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            let message = body["message"].as_str().unwrap();

            assert!(!message.contains(leaked_detail), "泄露了内部细节: {message}");
            assert!(message.contains("服务内部错误"));
        }
    }

    #[tokio::test]
    async fn test_business_errors_preserve_display_message() {
        let response = ApiError::not_found("Order", "5f1c").into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(body["message"].as_str().unwrap().contains("5f1c"));
    }

    #[test]
    fn test_from_booking_error() {
        let cases: Vec<(BookingError, &str)> = vec![
            (BookingError::InvalidRequest("items".into()), "INVALID_REQUEST"),
            (BookingError::InvalidIdentifier("x".into()), "INVALID_IDENTIFIER"),
            (BookingError::not_found("Lesson", "x"), "NOT_FOUND"),
            (BookingError::StorageUnavailable("down".into()), "STORAGE_UNAVAILABLE"),
            (BookingError::Internal("boom".into()), "INTERNAL_ERROR"),
        ];

        for (err, expected_code) in cases {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.error_code(), expected_code);
        }
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add("phone", ValidationError::new("not_blank"));

        let api_err: ApiError = errors.into();
        match &api_err {
            ApiError::InvalidRequest(msg) => assert!(msg.contains("phone")),
            other => panic!("期望 InvalidRequest，实际: {:?}", other),
        }
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
    }
}

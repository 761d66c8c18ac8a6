use axum::Json;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::StoreError;

/// 网关错误，统一序列化为 `{"error": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 存储层错误转换为对外错误；未归类的错误只记录日志，返回通用提示
    pub fn from_store(e: StoreError, context: &str) -> Self {
        match e {
            StoreError::UniqueViolation => AppError::Conflict(format!("{context}: already exists")),
            StoreError::PolicyDenied => AppError::Forbidden(
                "Access denied: row level security policy violation".to_string(),
            ),
            StoreError::NotFound => AppError::NotFound(format!("{context}: not found")),
            StoreError::MissingReference => {
                AppError::BadRequest(format!("{context}: referenced pet does not exist"))
            }
            other => {
                tracing::error!("{context}: {other}");
                AppError::Internal(context.to_string())
            }
        }
    }
}

// 请求体无法解析或字段类型不符时统一为 400
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

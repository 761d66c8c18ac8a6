use axum::extract::FromRequest;

use crate::error::AppError;

pub mod application;
pub mod favorite;
pub mod message;
pub mod pet;

/// JSON 请求体；解析失败同样返回 `{"error": "..."}` 和 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// 必填字符串字段：缺失或全空白都视为未提供
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

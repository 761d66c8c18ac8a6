use axum::extract::{Json, Path, State};

use super::model::MarkReadRequest;
use crate::AppState;
use crate::error::AppError;
use crate::models::Message;
use crate::routes::ApiJson;

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .store
        .list_messages(&user_id)
        .await
        .map_err(|e| AppError::from_store(e, "Error fetching messages"))?;

    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    ApiJson(req): ApiJson<MarkReadRequest>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .store
        .set_message_read(&message_id, req.is_read.unwrap_or(true))
        .await
        .map_err(|e| AppError::from_store(e, "Error updating message"))?;

    Ok(Json(message))
}

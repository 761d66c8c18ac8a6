use axum::extract::{Json, Path, State};

use super::model::SubmitApplicationRequest;
use crate::AppState;
use crate::error::AppError;
use crate::models::{Application, NewApplication, NewMessage};
use crate::routes::{ApiJson, required};
use crate::store::StoreError;

/// 提交领养申请。
///
/// 同一用户对同一宠物只能申请一次，重复提交返回 409。申请写入成功后
/// 再写一条系统通知；两次写入不在同一事务中，通知写入失败只记录日志。
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmitApplicationRequest>,
) -> Result<Json<Application>, AppError> {
    let (Some(user_id), Some(pet_id), Some(pet_name)) = (
        required(req.user_id),
        required(req.pet_id),
        required(req.pet_name),
    ) else {
        return Err(AppError::BadRequest(
            "user_id, pet_id, and pet_name are required".to_string(),
        ));
    };

    // 检查是否已提交过
    let existing = state
        .store
        .find_application(&user_id, &pet_id)
        .await
        .map_err(|e| AppError::from_store(e, "Error checking application"))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Application already submitted".to_string()));
    }

    let application = match state
        .store
        .insert_application(NewApplication {
            user_id: user_id.clone(),
            pet_id,
            pet_name: pet_name.clone(),
            pet_image: required(req.pet_image),
        })
        .await
    {
        Ok(application) => application,
        // 并发提交时由唯一约束兜底
        Err(StoreError::UniqueViolation) => {
            return Err(AppError::Conflict("Application already submitted".to_string()));
        }
        Err(e) => return Err(AppError::from_store(e, "Error submitting application")),
    };

    if let Err(e) = state
        .store
        .insert_message(NewMessage::application_submitted(&user_id, &pet_name))
        .await
    {
        tracing::warn!(
            "Failed to create notification for application {}: {}",
            application.id,
            e
        );
    }

    Ok(Json(application))
}

#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications = state
        .store
        .list_applications(&user_id)
        .await
        .map_err(|e| AppError::from_store(e, "Error fetching applications"))?;

    Ok(Json(applications))
}

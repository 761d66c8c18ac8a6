use axum::extract::{Json, Path, State};

use super::model::{CreateFavoriteRequest, RemoveFavoriteResponse};
use crate::AppState;
use crate::error::AppError;
use crate::models::{FavoriteMark, Pet};
use crate::routes::{ApiJson, required};
use crate::store::StoreError;

/// 收藏记录关联到宠物行后返回
#[axum::debug_handler]
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pet_ids = state
        .store
        .list_favorite_pet_ids(&user_id)
        .await
        .map_err(|e| AppError::from_store(e, "Error fetching favorites"))?;

    if pet_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let pets = state
        .store
        .find_pets_by_ids(&pet_ids)
        .await
        .map_err(|e| AppError::from_store(e, "Error fetching favorite pets"))?;

    Ok(Json(pets))
}

#[axum::debug_handler]
pub async fn add_favorite(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateFavoriteRequest>,
) -> Result<Json<FavoriteMark>, AppError> {
    let (Some(user_id), Some(pet_id)) = (required(req.user_id), required(req.pet_id)) else {
        return Err(AppError::BadRequest(
            "user_id and pet_id are required".to_string(),
        ));
    };

    match state.store.insert_favorite(&user_id, &pet_id).await {
        Ok(mark) => Ok(Json(mark)),
        Err(StoreError::UniqueViolation) => {
            Err(AppError::Conflict("Favorite already exists".to_string()))
        }
        Err(e) => Err(AppError::from_store(e, "Error adding favorite")),
    }
}

#[axum::debug_handler]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, pet_id)): Path<(String, String)>,
) -> Result<Json<RemoveFavoriteResponse>, AppError> {
    state
        .store
        .delete_favorite(&user_id, &pet_id)
        .await
        .map_err(|e| AppError::from_store(e, "Error removing favorite"))?;

    Ok(Json(RemoveFavoriteResponse { success: true }))
}

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use super::model::CreatePetRequest;
use crate::AppState;
use crate::error::AppError;
use crate::models::Pet;
use crate::routes::ApiJson;

#[axum::debug_handler]
pub async fn list_pets(State(state): State<AppState>) -> Result<Json<Vec<Pet>>, AppError> {
    if let Some(cache) = &state.pet_cache {
        match cache.get_pets().await {
            Ok(Some(pets)) => {
                tracing::debug!("Get pets from cache");
                return Ok(Json(pets));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read pets cache: {}", e),
        }
    }

    let pets = state
        .store
        .list_pets()
        .await
        .map_err(|e| AppError::from_store(e, "Error fetching pets"))?;

    if let Some(cache) = &state.pet_cache {
        if let Err(e) = cache.cache_pets(&pets).await {
            tracing::warn!("Failed to cache pets: {}", e);
        }
    }

    Ok(Json(pets))
}

#[axum::debug_handler]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pet>, AppError> {
    match state.store.find_pet(&id).await {
        Ok(Some(pet)) => Ok(Json(pet)),
        Ok(None) => Err(AppError::NotFound("Pet not found".to_string())),
        Err(e) => Err(AppError::from_store(e, "Error fetching pet")),
    }
}

#[axum::debug_handler]
pub async fn create_pet(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePetRequest>,
) -> Result<(StatusCode, Json<Pet>), AppError> {
    let new_pet = req.into_new_pet()?;

    let pet = state
        .store
        .insert_pet(new_pet)
        .await
        .map_err(|e| AppError::from_store(e, "Error adding pet"))?;

    if let Some(cache) = &state.pet_cache {
        if let Err(e) = cache.invalidate().await {
            tracing::warn!("Failed to invalidate pets cache: {}", e);
        }
    }

    Ok((StatusCode::CREATED, Json(pet)))
}

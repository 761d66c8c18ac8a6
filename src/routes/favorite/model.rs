use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub user_id: Option<String>,
    pub pet_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveFavoriteResponse {
    pub success: bool,
}

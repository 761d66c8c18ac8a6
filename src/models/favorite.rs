use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 收藏关系，(user_id, pet_id) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteMark {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    Category {
        Dog => "dog",
        Cat => "cat",
        Other => "other",
    }
}

text_enum! {
    Gender {
        Male => "male",
        Female => "female",
    }
}

text_enum! {
    /// 领养状态，只会被收容所一侧修改
    PetStatus {
        Available => "available",
        Pending => "pending",
        Adopted => "adopted",
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Default for PetStatus {
    fn default() -> Self {
        PetStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: Option<String>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub distance: Option<String>,
    pub image: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default)]
    pub neutered: bool,
    #[serde(default)]
    pub status: PetStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// 新增宠物时写入存储的字段，默认值已填充
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: Option<String>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub distance: Option<String>,
    pub image: String,
    pub category: Category,
    pub description: String,
    pub vaccinated: bool,
    pub neutered: bool,
    pub status: PetStatus,
    pub tags: Vec<String>,
    pub gallery: Vec<String>,
    pub shelter_id: Option<String>,
}

impl Pet {
    /// 名字或品种包含关键字（忽略大小写）
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.breed.to_lowercase().contains(&query)
    }
}

use serde::{Deserialize, Serialize};

/// 发布宠物的收容所
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub published_count: u32,
}

/// 暂无收容所数据时详情页显示的名称
pub const UNKNOWN_SHELTER_NAME: &str = "暂无数据";

impl Default for Shelter {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: UNKNOWN_SHELTER_NAME.to_string(),
            avatar: String::new(),
            published_count: 0,
        }
    }
}

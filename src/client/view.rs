use crate::models::{Application, Category, Pet, Shelter};

use super::cache::MessageEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Discovery,
    Favorites,
    Messages,
    Detail,
    Form,
    Profile,
}

/// 界面渲染所需的数据快照
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Welcome,
    Discovery {
        pets: Vec<Pet>,
        filter: DiscoveryFilter,
    },
    Favorites {
        pets: Vec<Pet>,
    },
    Messages {
        messages: Vec<MessageEntry>,
        unread: usize,
    },
    Detail {
        pet: Pet,
        is_favorite: bool,
        /// 收藏请求进行中，按钮应禁用
        toggling: bool,
        /// 后端没有收容所接口，目前总是占位数据
        shelter: Shelter,
    },
    Form {
        pet: Pet,
    },
    Profile {
        user_id: String,
        applications: Vec<Application>,
    },
}

/// 发现页的分类和搜索条件；category 为 None 表示全部
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryFilter {
    pub category: Option<Category>,
    pub query: String,
}

impl DiscoveryFilter {
    pub fn matches(&self, pet: &Pet) -> bool {
        let category_ok = self.category.is_none_or(|c| pet.category == c);
        category_ok && pet.matches_query(self.query.trim())
    }

    pub fn apply<'a>(&self, pets: &'a [Pet]) -> Vec<&'a Pet> {
        pets.iter().filter(|pet| self.matches(pet)).collect()
    }
}

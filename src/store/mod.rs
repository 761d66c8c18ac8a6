//! 行存储访问层。
//!
//! 每个方法对应一次单表操作（收藏列表除外，它需要先取 pet_id 再取宠物行）。
//! 唯一约束冲突、外键缺失和权限拒绝以独立的错误类型返回，由路由层映射为 409/400/403。

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::models::{Application, FavoriteMark, Message, NewApplication, NewMessage, NewPet, Pet};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("row level security policy violated")]
    PolicyDenied,
    #[error("row not found")]
    NotFound,
    #[error("referenced row does not exist")]
    MissingReference,
    #[error("invalid row: {0}")]
    Invalid(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

// Postgres 错误码
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INSUFFICIENT_PRIVILEGE: &str = "42501";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation,
                Some(FOREIGN_KEY_VIOLATION) => StoreError::MissingReference,
                Some(INSUFFICIENT_PRIVILEGE) => StoreError::PolicyDenied,
                _ => StoreError::Database(e),
            },
            _ => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// 按创建时间倒序
    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError>;
    async fn find_pet(&self, id: &str) -> Result<Option<Pet>, StoreError>;
    async fn find_pets_by_ids(&self, ids: &[String]) -> Result<Vec<Pet>, StoreError>;
    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, StoreError>;

    async fn list_favorite_pet_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
    async fn insert_favorite(&self, user_id: &str, pet_id: &str)
    -> Result<FavoriteMark, StoreError>;
    /// 不存在时同样视为成功
    async fn delete_favorite(&self, user_id: &str, pet_id: &str) -> Result<(), StoreError>;

    async fn find_application(
        &self,
        user_id: &str,
        pet_id: &str,
    ) -> Result<Option<Application>, StoreError>;
    async fn insert_application(&self, app: NewApplication) -> Result<Application, StoreError>;
    /// 按日期倒序
    async fn list_applications(&self, user_id: &str) -> Result<Vec<Application>, StoreError>;

    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError>;
    /// 按创建时间倒序
    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError>;
    async fn set_message_read(&self, id: &str, is_read: bool) -> Result<Message, StoreError>;
}

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{RowStore, StoreError};
use crate::models::{
    Application, ApplicationStatus, FavoriteMark, Message, NewApplication, NewMessage, NewPet,
    Pet,
};

/// 进程内存储，未配置数据库时使用，也用于测试。
/// 约束与 Postgres 表结构一致：(user_id, pet_id) 唯一。
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    pets: Vec<Pet>,
    favorites: Vec<FavoriteMark>,
    applications: Vec<Application>,
    messages: Vec<Message>,
}

impl Tables {
    // 与 Postgres 的外键约束一致
    fn require_pet(&self, pet_id: &str) -> Result<(), StoreError> {
        if self.pets.iter().any(|p| p.id == pet_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference)
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError> {
        // 插入顺序即时间顺序，倒序即最新优先
        Ok(self.tables.lock().pets.iter().rev().cloned().collect())
    }

    async fn find_pet(&self, id: &str) -> Result<Option<Pet>, StoreError> {
        Ok(self.tables.lock().pets.iter().find(|p| p.id == id).cloned())
    }

    async fn find_pets_by_ids(&self, ids: &[String]) -> Result<Vec<Pet>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .pets
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, StoreError> {
        let pet = Pet {
            id: new_id(),
            name: pet.name,
            breed: pet.breed,
            age: pet.age,
            gender: pet.gender,
            location: pet.location,
            distance: pet.distance,
            image: pet.image,
            category: pet.category,
            description: pet.description,
            vaccinated: pet.vaccinated,
            neutered: pet.neutered,
            status: pet.status,
            tags: pet.tags,
            gallery: pet.gallery,
            created_at: Utc::now(),
        };
        self.tables.lock().pets.push(pet.clone());
        Ok(pet)
    }

    async fn list_favorite_pet_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables
            .lock()
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.pet_id.clone())
            .collect())
    }

    async fn insert_favorite(
        &self,
        user_id: &str,
        pet_id: &str,
    ) -> Result<FavoriteMark, StoreError> {
        let mut tables = self.tables.lock();
        tables.require_pet(pet_id)?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.pet_id == pet_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let mark = FavoriteMark {
            id: new_id(),
            user_id: user_id.to_string(),
            pet_id: pet_id.to_string(),
            created_at: Utc::now(),
        };
        tables.favorites.push(mark.clone());
        Ok(mark)
    }

    async fn delete_favorite(&self, user_id: &str, pet_id: &str) -> Result<(), StoreError> {
        self.tables
            .lock()
            .favorites
            .retain(|f| !(f.user_id == user_id && f.pet_id == pet_id));
        Ok(())
    }

    async fn find_application(
        &self,
        user_id: &str,
        pet_id: &str,
    ) -> Result<Option<Application>, StoreError> {
        Ok(self
            .tables
            .lock()
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.pet_id == pet_id)
            .cloned())
    }

    async fn insert_application(&self, app: NewApplication) -> Result<Application, StoreError> {
        let mut tables = self.tables.lock();
        tables.require_pet(&app.pet_id)?;
        if tables
            .applications
            .iter()
            .any(|a| a.user_id == app.user_id && a.pet_id == app.pet_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let application = Application {
            id: new_id(),
            user_id: app.user_id,
            pet_id: app.pet_id,
            pet_name: app.pet_name,
            pet_image: app.pet_image,
            status: ApplicationStatus::PendingReview,
            date: Utc::now(),
        };
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn list_applications(&self, user_id: &str) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .tables
            .lock()
            .applications
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let message = Message {
            id: new_id(),
            user_id: message.user_id,
            title: message.title,
            content: message.content,
            kind: message.kind,
            is_read: false,
            created_at: Utc::now(),
        };
        self.tables.lock().messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .tables
            .lock()
            .messages
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_message_read(&self, id: &str, is_read: bool) -> Result<Message, StoreError> {
        let mut tables = self.tables.lock();
        let message = tables
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        message.is_read = is_read;
        Ok(message.clone())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{RowStore, StoreError};
use crate::models::{
    Application, FavoriteMark, Message, NewApplication, NewMessage, NewPet, Pet,
    UnknownVariant,
};

const PET_COLUMNS: &str = "id, name, breed, age, gender, location, distance, image, category, \
     description, vaccinated, neutered, status, tags, gallery, created_at";
const APPLICATION_COLUMNS: &str = "id, user_id, pet_id, pet_name, pet_image, status, date";
const MESSAGE_COLUMNS: &str = "id, user_id, title, content, type AS kind, is_read, created_at";

/// 基于 Postgres 连接池的行存储
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PetRow {
    id: String,
    name: String,
    breed: String,
    age: Option<String>,
    gender: Option<String>,
    location: Option<String>,
    distance: Option<String>,
    image: String,
    category: String,
    description: String,
    vaccinated: bool,
    neutered: bool,
    status: String,
    tags: Vec<String>,
    gallery: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: String,
    user_id: String,
    pet_id: String,
    pet_name: String,
    pet_image: Option<String>,
    status: String,
    date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    user_id: String,
    title: String,
    content: String,
    kind: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<UnknownVariant> for StoreError {
    fn from(e: UnknownVariant) -> Self {
        StoreError::Invalid(e.to_string())
    }
}

impl TryFrom<PetRow> for Pet {
    type Error = StoreError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        Ok(Pet {
            id: row.id,
            name: row.name,
            breed: row.breed,
            age: row.age,
            gender: row.gender.as_deref().map(str::parse).transpose()?,
            location: row.location,
            distance: row.distance,
            image: row.image,
            category: row.category.parse()?,
            description: row.description,
            vaccinated: row.vaccinated,
            neutered: row.neutered,
            status: row.status.parse()?,
            tags: row.tags,
            gallery: row.gallery,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            user_id: row.user_id,
            pet_id: row.pet_id,
            pet_name: row.pet_name,
            pet_image: row.pet_image,
            status: row.status.parse()?,
            date: row.date,
        })
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            kind: row.kind.parse()?,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl RowStore for PgStore {
    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn find_pet(&self, id: &str) -> Result<Option<Pet>, StoreError> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Pet::try_from).transpose()
    }

    async fn find_pets_by_ids(&self, ids: &[String]) -> Result<Vec<Pet>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, StoreError> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            r#"
            INSERT INTO pets (name, breed, age, gender, location, distance, image, category,
                              description, vaccinated, neutered, status, tags, gallery, shelter_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(&pet.name)
        .bind(&pet.breed)
        .bind(&pet.age)
        .bind(pet.gender.map(|g| g.as_str()))
        .bind(&pet.location)
        .bind(&pet.distance)
        .bind(&pet.image)
        .bind(pet.category.as_str())
        .bind(&pet.description)
        .bind(pet.vaccinated)
        .bind(pet.neutered)
        .bind(pet.status.as_str())
        .bind(&pet.tags)
        .bind(&pet.gallery)
        .bind(&pet.shelter_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Inserted pet: {}", row.id);
        row.try_into()
    }

    async fn list_favorite_pet_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT pet_id FROM favorites WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn insert_favorite(
        &self,
        user_id: &str,
        pet_id: &str,
    ) -> Result<FavoriteMark, StoreError> {
        let (id, user_id, pet_id, created_at) =
            sqlx::query_as::<_, (String, String, String, DateTime<Utc>)>(
                r#"
                INSERT INTO favorites (user_id, pet_id)
                VALUES ($1, $2)
                RETURNING id, user_id, pet_id, created_at
                "#,
            )
            .bind(user_id)
            .bind(pet_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(FavoriteMark {
            id,
            user_id,
            pet_id,
            created_at,
        })
    }

    async fn delete_favorite(&self, user_id: &str, pet_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND pet_id = $2")
            .bind(user_id)
            .bind(pet_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_application(
        &self,
        user_id: &str,
        pet_id: &str,
    ) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = $1 AND pet_id = $2"
        ))
        .bind(user_id)
        .bind(pet_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose()
    }

    async fn insert_application(&self, app: NewApplication) -> Result<Application, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (user_id, pet_id, pet_name, pet_image)
            VALUES ($1, $2, $3, $4)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(&app.user_id)
        .bind(&app.pet_id)
        .bind(&app.pet_name)
        .bind(&app.pet_image)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_applications(&self, user_id: &str) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn insert_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            INSERT INTO messages (user_id, title, content, type)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(&message.user_id)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn set_message_read(&self, id: &str, is_read: bool) -> Result<Message, StoreError> {
        // RETURNING 无行时 fetch_one 返回 RowNotFound，映射为 NotFound
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "UPDATE messages SET is_read = $1 WHERE id = $2 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(is_read)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }
}

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::models::{Application, FavoriteMark, Message, Pet};
use crate::routes::application::SubmitApplicationRequest;
use crate::routes::favorite::RemoveFavoriteResponse;
use crate::routes::message::MarkReadRequest;
use crate::routes::pet::CreatePetRequest;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }

    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// 网关接口，控制器只通过它访问后端
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn pets(&self) -> Result<Vec<Pet>, ApiError>;
    async fn pet(&self, id: &str) -> Result<Pet, ApiError>;
    /// 返回收藏的宠物对象而不是收藏记录
    async fn favorites(&self, user_id: &str) -> Result<Vec<Pet>, ApiError>;
    async fn add_favorite(&self, user_id: &str, pet_id: &str) -> Result<FavoriteMark, ApiError>;
    async fn remove_favorite(&self, user_id: &str, pet_id: &str) -> Result<(), ApiError>;
    async fn submit_application(&self, user_id: &str, pet: &Pet)
    -> Result<Application, ApiError>;
    async fn applications(&self, user_id: &str) -> Result<Vec<Application>, ApiError>;
    async fn messages(&self, user_id: &str) -> Result<Vec<Message>, ApiError>;
    async fn mark_message_read(&self, message_id: &str, is_read: bool)
    -> Result<Message, ApiError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct AddFavoriteBody<'a> {
    user_id: &'a str,
    pet_id: &'a str,
}

/// 基于 reqwest 的网关客户端
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 收容所一侧新增宠物
    pub async fn create_pet(&self, req: &CreatePetRequest) -> Result<Pet, ApiError> {
        let response = self.client.post(self.url("/pets")).json(req).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ApiError::from_status(status, message))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn pets(&self) -> Result<Vec<Pet>, ApiError> {
        let response = self.client.get(self.url("/pets")).send().await?;
        decode(response).await
    }

    async fn pet(&self, id: &str) -> Result<Pet, ApiError> {
        let response = self.client.get(self.url(&format!("/pets/{id}"))).send().await?;
        decode(response).await
    }

    async fn favorites(&self, user_id: &str) -> Result<Vec<Pet>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/favorites/{user_id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn add_favorite(&self, user_id: &str, pet_id: &str) -> Result<FavoriteMark, ApiError> {
        let response = self
            .client
            .post(self.url("/favorites"))
            .json(&AddFavoriteBody { user_id, pet_id })
            .send()
            .await?;
        decode(response).await
    }

    async fn remove_favorite(&self, user_id: &str, pet_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/favorites/{user_id}/{pet_id}")))
            .send()
            .await?;
        let _: RemoveFavoriteResponse = decode(response).await?;
        Ok(())
    }

    async fn submit_application(
        &self,
        user_id: &str,
        pet: &Pet,
    ) -> Result<Application, ApiError> {
        let body = SubmitApplicationRequest {
            user_id: Some(user_id.to_string()),
            pet_id: Some(pet.id.clone()),
            pet_name: Some(pet.name.clone()),
            pet_image: Some(pet.image.clone()),
        };
        let response = self
            .client
            .post(self.url("/applications"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    async fn applications(&self, user_id: &str) -> Result<Vec<Application>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/applications/{user_id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn messages(&self, user_id: &str) -> Result<Vec<Message>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/messages/{user_id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn mark_message_read(
        &self,
        message_id: &str,
        is_read: bool,
    ) -> Result<Message, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/messages/{message_id}")))
            .json(&MarkReadRequest {
                is_read: Some(is_read),
            })
            .send()
            .await?;
        decode(response).await
    }
}

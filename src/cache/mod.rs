// 宠物列表缓存
// Redis 不可用时所有操作都只记录日志，请求照常走行存储

use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};

use crate::models::Pet;

/// 宠物列表缓存键
pub const PETS_ALL_KEY: &str = "pets:all";

/// 宠物列表缓存操作
#[derive(Clone)]
pub struct PetCacheOperations {
    redis_client: Arc<RedisClient>,
    ttl_secs: u64,
}

impl PetCacheOperations {
    pub fn new(redis_client: Arc<RedisClient>, ttl_secs: u64) -> Self {
        Self {
            redis_client,
            ttl_secs,
        }
    }

    /// 读取缓存的宠物列表，未命中返回 None
    pub async fn get_pets(&self) -> Result<Option<Vec<Pet>>, redis::RedisError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(PETS_ALL_KEY).await?;

        match cached {
            Some(json) => {
                let pets = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(pets))
            }
            None => Ok(None),
        }
    }

    pub async fn cache_pets(&self, pets: &[Pet]) -> Result<(), redis::RedisError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(pets).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;
        let _: () = conn.set_ex(PETS_ALL_KEY, json, self.ttl_secs).await?;
        Ok(())
    }

    /// 新增宠物后清除列表缓存
    pub async fn invalidate(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(PETS_ALL_KEY).await?;
        Ok(())
    }
}

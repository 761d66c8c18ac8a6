use std::sync::Arc;

use cache::PetCacheOperations;
use config::Config;
use store::RowStore;

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RowStore>,
    pub config: Config,
    /// 未配置 Redis 时为 None
    pub pet_cache: Option<PetCacheOperations>,
}

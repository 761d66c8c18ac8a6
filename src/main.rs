use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use adoption::{
    AppState,
    cache::PetCacheOperations,
    config::Config,
    router::create_router,
    store::{MemoryStore, PgStore, RowStore},
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    // 设置行存储
    let store: Arc<dyn RowStore> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        conn.execute("SET application_name = 'adoption_gateway';")
                            .await?;
                        Ok(())
                    })
                })
                .connect(database_url)
                .await
                .expect("Failed to connect to Postgres");

            if config.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .expect("Failed to run migrations");
                tracing::info!("Database migrations applied");
            }

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // 设置 Redis 宠物列表缓存
    let pet_cache = config.redis_url.as_ref().map(|redis_url| {
        let client = redis::Client::open(redis_url.as_str()).expect("Failed to create Redis client");
        PetCacheOperations::new(Arc::new(client), config.pets_cache_ttl_secs)
    });
    if pet_cache.is_none() {
        tracing::info!("REDIS_URL not set, pets cache disabled");
    }

    // 设置应用状态
    let state = AppState {
        store,
        config: config.clone(),
        pet_cache,
    };

    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}{}", addr, config.api_base_uri);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}

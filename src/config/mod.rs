use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// 网关服务配置
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    /// 未设置时使用进程内存储
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    /// 未设置时不缓存宠物列表
    pub redis_url: Option<String>,
    pub pets_cache_ttl_secs: u64,
    pub cors_permissive: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            server_host: var_or("SERVER_HOST", "0.0.0.0"),
            server_port: parse_or("SERVER_PORT", 3001),
            api_base_uri: var_or("API_BASE_URI", "/api"),
            database_url: optional_var("DATABASE_URL"),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            run_migrations: parse_or("RUN_MIGRATIONS", false),
            redis_url: optional_var("REDIS_URL"),
            pets_cache_ttl_secs: parse_or("PETS_CACHE_TTL", 300),
            cors_permissive: parse_or("CORS_PERMISSIVE", true),
        }
    }
}

/// 客户端配置：网关地址和认证服务
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub auth_url: String,
    pub auth_anon_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        ClientConfig {
            api_base_url: var_or("API_BASE_URL", "http://localhost:3001/api"),
            auth_url: var_or("SUPABASE_URL", ""),
            auth_anon_key: var_or("SUPABASE_ANON_KEY", ""),
        }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    optional_var(key).unwrap_or_else(|| {
        tracing::debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_value(key, optional_var(key), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        None => default,
    }
}

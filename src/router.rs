use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use crate::{AppState, middleware::log_errors, routes};

// 宠物相关的路由
fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/pets", get(routes::pet::list_pets).post(routes::pet::create_pet))
        .route("/pets/{id}", get(routes::pet::get_pet))
}

// 收藏相关的路由
fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", post(routes::favorite::add_favorite))
        .route("/favorites/{user_id}", get(routes::favorite::list_favorites))
        .route(
            "/favorites/{user_id}/{pet_id}",
            delete(routes::favorite::remove_favorite),
        )
}

// 领养申请相关的路由
fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            post(routes::application::submit_application),
        )
        .route(
            "/applications/{user_id}",
            get(routes::application::list_applications),
        )
}

// 消息相关的路由
fn message_routes() -> Router<AppState> {
    Router::new()
        // GET 时为 user_id，PATCH 时为 message_id
        .route(
            "/messages/{id}",
            get(routes::message::list_messages).patch(routes::message::mark_message_read),
        )
}

/// 创建主路由：所有路由挂在 `api_base_uri` 下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(pet_routes())
        .merge(favorite_routes())
        .merge(application_routes())
        .merge(message_routes());

    // 根路径不能 nest
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(base, api)
    };
    let router = router.layer(axum::middleware::from_fn(log_errors));

    let router = if state.config.cors_permissive {
        tracing::debug!("Adding permissive CORS layer");
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

mod handler;
mod model;

pub use handler::{add_favorite, list_favorites, remove_favorite};
pub use model::{CreateFavoriteRequest, RemoveFavoriteResponse};

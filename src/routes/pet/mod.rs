mod handler;
mod model;

pub use handler::{create_pet, get_pet, list_pets};
pub use model::CreatePetRequest;

mod handler;
mod model;

pub use handler::{list_messages, mark_message_read};
pub use model::MarkReadRequest;

mod handler;
mod model;

pub use handler::{list_applications, submit_application};
pub use model::SubmitApplicationRequest;

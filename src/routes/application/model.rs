use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SubmitApplicationRequest {
    pub user_id: Option<String>,
    pub pet_id: Option<String>,
    pub pet_name: Option<String>,
    pub pet_image: Option<String>,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MarkReadRequest {
    /// 缺省视为标记已读
    pub is_read: Option<bool>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    MessageKind {
        System => "system",
        Chat => "chat",
    }
}

pub const APPLICATION_SUBMITTED_TITLE: &str = "申请提交成功";

/// 申请提交成功后的系统通知正文，服务端落库和客户端本地插入共用
pub fn application_submitted_content(pet_name: &str) -> String {
    format!("您对\"{}\"的领养申请已成功提交，请耐心等待审核。", pet_name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub kind: MessageKind,
}

impl NewMessage {
    pub fn application_submitted(user_id: &str, pet_name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            title: APPLICATION_SUBMITTED_TITLE.to_string(),
            content: application_submitted_content(pet_name),
            kind: MessageKind::System,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    /// 审核状态，提交后只由审核方修改
    ApplicationStatus {
        PendingReview => "审核中",
        Approved => "已通过",
        Rejected => "未通过",
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::PendingReview
    }
}

/// 领养申请，宠物名称和图片为提交时的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub pet_name: String,
    #[serde(default)]
    pub pet_image: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub user_id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub pet_image: Option<String>,
}

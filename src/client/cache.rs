use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    APPLICATION_SUBMITTED_TITLE, Application, Message, MessageKind, Pet,
    application_submitted_content,
};

/// 消息来源：本地合成的临时消息在下次拉取服务端列表时整体丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Provisional,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub message: Message,
    pub origin: Origin,
}

/// 进程内的用户数据视图。后端才是数据源，这里从不跨会话保留。
///
/// 申请和消息都保持最新在前。
#[derive(Debug, Default, Clone)]
pub struct ClientCache {
    pets: Vec<Pet>,
    favorites: Vec<String>,
    applications: Vec<Application>,
    messages: Vec<MessageEntry>,
}

impl ClientCache {
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn replace_pets(&mut self, pets: Vec<Pet>) {
        self.pets = pets;
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, pet_id: &str) -> bool {
        self.favorites.iter().any(|id| id == pet_id)
    }

    /// 加入时追加到末尾，重复加入不产生第二条
    pub fn set_favorite(&mut self, pet_id: &str, favorite: bool) {
        if favorite {
            if !self.is_favorite(pet_id) {
                self.favorites.push(pet_id.to_string());
            }
        } else {
            self.favorites.retain(|id| id != pet_id);
        }
    }

    pub fn replace_favorites(&mut self, pet_ids: impl IntoIterator<Item = String>) {
        self.favorites.clear();
        for id in pet_ids {
            self.set_favorite(&id, true);
        }
    }

    /// 收藏列表中、且在已加载宠物里能找到的宠物
    pub fn favorite_pets(&self) -> Vec<&Pet> {
        self.pets
            .iter()
            .filter(|pet| self.is_favorite(&pet.id))
            .collect()
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn prepend_application(&mut self, application: Application) {
        self.applications.insert(0, application);
    }

    pub fn replace_applications(&mut self, applications: Vec<Application>) {
        self.applications = applications;
    }

    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.message.is_read).count()
    }

    pub fn prepend_provisional_message(&mut self, message: Message) {
        self.messages.insert(
            0,
            MessageEntry {
                message,
                origin: Origin::Provisional,
            },
        );
    }

    /// 用服务端列表整体替换，临时消息随之丢弃
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages
            .into_iter()
            .map(|message| MessageEntry {
                message,
                origin: Origin::Confirmed,
            })
            .collect();
    }

    /// 返回修改前的已读状态，消息不存在时返回 None
    pub fn set_message_read(&mut self, message_id: &str, is_read: bool) -> Option<bool> {
        let entry = self
            .messages
            .iter_mut()
            .find(|m| m.message.id == message_id)?;
        let previous = entry.message.is_read;
        entry.message.is_read = is_read;
        Some(previous)
    }

    pub fn message_origin(&self, message_id: &str) -> Option<Origin> {
        self.messages
            .iter()
            .find(|m| m.message.id == message_id)
            .map(|m| m.origin)
    }

    /// 登出时清空用户数据，宠物列表不属于用户数据
    pub fn clear_user_data(&mut self) {
        self.favorites.clear();
        self.applications.clear();
        self.messages.clear();
    }
}

/// 本地合成的申请成功通知。id 只保证在本地缓存内唯一
pub fn provisional_submission_message(user_id: &str, pet_name: &str) -> Message {
    Message {
        id: format!("local-{}", Uuid::new_v4().simple()),
        user_id: user_id.to_string(),
        title: APPLICATION_SUBMITTED_TITLE.to_string(),
        content: application_submitted_content(pet_name),
        kind: MessageKind::System,
        is_read: false,
        created_at: Utc::now(),
    }
}

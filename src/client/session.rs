//! 会话组件：包装外部认证服务，提供当前会话查询和会话变更订阅。

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("auth service error {status}: {message}")]
    Service { status: u16, message: String },
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// 外部认证服务
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 需要邮箱确认时不会立即产生会话，返回 None
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
    /// 恢复已保存的会话
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;
}

type Handler = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// 订阅句柄，调用 [`Subscription::unsubscribe`] 或析构时取消订阅
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.lock().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    current: Mutex<Option<Session>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    /// 注册会话变更回调，回调在触发事件的任务上同步执行
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.lock();
        subscribers.next_id += 1;
        let id = subscribers.next_id;
        subscribers.handlers.push((id, Arc::new(handler)));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    fn emit(&self, event: AuthEvent) {
        // 回调执行期间不持有锁，允许回调里取消订阅
        let handlers: Vec<Handler> = self
            .subscribers
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        let session = self.provider.sign_up(email, password, metadata).await?;
        if let Some(session) = &session {
            tracing::info!("Signed up user: {}", session.user_id);
            *self.current.lock() = Some(session.clone());
            self.emit(AuthEvent::SignedIn(session.clone()));
        }
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.provider.sign_in(email, password).await?;
        tracing::info!("Signed in user: {}", session.user_id);
        *self.current.lock() = Some(session.clone());
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// 本地会话总是被清除并通知订阅者；远端注销失败时返回错误
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.current.lock().take();
        let result = match &session {
            Some(session) => self.provider.sign_out(session).await,
            None => Ok(()),
        };
        if let Err(e) = &result {
            tracing::warn!("Remote sign out failed: {}", e);
        }
        self.emit(AuthEvent::SignedOut);
        result
    }

    pub async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let cached = self.current.lock().clone();
        if let Some(session) = cached {
            if !session.is_expired(Utc::now()) {
                return Ok(Some(session));
            }
        }

        let session = self.provider.current_session().await?;
        *self.current.lock() = session.clone();
        Ok(session)
    }
}

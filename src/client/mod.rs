//! 客户端状态核心：会话生命周期、本地缓存，以及收藏和领养申请的乐观更新。
//!
//! 界面层只读取 [`Controller::view`] 的结果并调用控制器的方法，
//! 缓存只在控制器内部修改。

pub mod api;
pub mod auth;
pub mod cache;
pub mod controller;
pub mod session;
pub mod view;

pub use api::{ApiError, Gateway, HttpGateway};
pub use auth::GoTrueAuth;
pub use cache::{ClientCache, MessageEntry, Origin};
pub use controller::{ActionError, Controller, Mounted, Notice, ToggleOutcome};
pub use session::{AuthError, AuthEvent, AuthProvider, Session, SessionManager, Subscription};
pub use view::{DiscoveryFilter, Screen, View};
